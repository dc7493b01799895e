//! Record command handlers, one generic function per verb.
//!
//! Each verb drives the same controller a screen would: `list` is a list
//! screen, `get` a detail screen, `create`/`update` a form.

use mobierp_core::{
    DetailController, DetailState, Entity, EntityId, Facet, FormController, ListController,
    ListView, Outcome, SortDirection,
};

use crate::cli::{CreateArgs, ListArgs, RecordArgs, SortArg, TransitionArgs, UpdateArgs};
use crate::commands::Session;
use crate::commands::util;
use crate::error::CliError;
use crate::interact::LoadingSpinner;
use crate::output;

fn sort_direction(arg: SortArg) -> SortDirection {
    match arg {
        SortArg::Asc => SortDirection::Ascending,
        SortArg::Desc => SortDirection::Descending,
    }
}

/// Open a detail screen for `id` and wait for it to load.
async fn open_detail<E: Entity>(
    session: &Session<'_>,
    id: &str,
) -> Result<DetailController<E>, CliError> {
    let detail = DetailController::<E>::new(session.ctx.clone(), EntityId::from(id));
    let spinner = LoadingSpinner::track(
        detail.subscribe(),
        |state: &DetailState<E>| state.is_loading(),
        format!("Loading {} {id}", E::KIND.singular().to_lowercase()),
        session.global.quiet,
    );
    let outcome = detail.load().await;
    if let Some(spinner) = spinner {
        spinner.finish().await;
    }
    session.settle(outcome)?;
    Ok(detail)
}

fn loaded<E: Entity>(detail: &DetailController<E>) -> Result<E, CliError> {
    detail.record().ok_or_else(|| CliError::NotFound {
        resource_type: E::KIND.to_string(),
        identifier: detail.id().to_string(),
    })
}

fn print_record<E: Entity>(session: &Session<'_>, record: &E) {
    let out = output::render_single(
        &session.global.output,
        record,
        output::record_detail::<E>,
        |r| r.id().to_string(),
    );
    output::print_output(&out, session.global.quiet);
}

// ── list ────────────────────────────────────────────────────────────

pub async fn list<E: Entity>(session: &Session<'_>, args: &ListArgs) -> Result<(), CliError> {
    let list = ListController::<E>::new(session.ctx.clone());
    if let Some(ref query) = args.search {
        list.set_search_query(query.clone());
    }
    if let Some(ref facet) = args.facet {
        list.set_facet_filter(Facet::parse(facet));
    }
    list.set_sort_direction(args.sort.map(sort_direction));

    let spinner = LoadingSpinner::track(
        list.subscribe(),
        |view: &ListView<E>| view.is_loading() || view.is_refreshing(),
        format!("Loading {}", E::KIND.plural().to_lowercase()),
        session.global.quiet,
    );
    let outcome = list.load().await;
    if let Some(spinner) = spinner {
        spinner.finish().await;
    }
    session.settle(outcome)?;

    let items = list.derived_items();
    tracing::debug!(kind = %E::KIND, shown = items.len(), "list rendered");
    let out = output::render_list(
        &session.global.output,
        &items,
        output::record_row::<E>,
        |r| r.id().to_string(),
    );
    output::print_output(&out, session.global.quiet);
    Ok(())
}

// ── get ─────────────────────────────────────────────────────────────

pub async fn get<E: Entity>(session: &Session<'_>, args: &RecordArgs) -> Result<(), CliError> {
    let detail = open_detail::<E>(session, &args.id).await?;
    print_record(session, &loaded(&detail)?);
    Ok(())
}

// ── create / update ─────────────────────────────────────────────────

pub async fn create<E: Entity>(session: &Session<'_>, args: &CreateArgs) -> Result<(), CliError> {
    let fields = util::collect_fields(&args.set, args.from_file.as_deref())?;

    let mut form = FormController::<E>::create(session.ctx.clone());
    form.set_fields(fields);
    session.settle(form.submit().await)?;

    if let Some(saved) = form.saved() {
        print_record(session, saved);
    }
    Ok(())
}

pub async fn update<E: Entity>(session: &Session<'_>, args: &UpdateArgs) -> Result<(), CliError> {
    let fields = util::collect_fields(&args.set, args.from_file.as_deref())?;
    if fields.is_empty() {
        return Err(CliError::Validation {
            field: "set".into(),
            reason: "nothing to update; pass --set KEY=VALUE or --from-file".into(),
        });
    }

    let detail = open_detail::<E>(session, &args.id).await?;
    let Some(mut form) = FormController::edit(session.ctx.clone(), loaded(&detail)?) else {
        return session.settle(Outcome::Rejected);
    };
    form.set_fields(fields);
    session.settle(form.submit().await)?;

    if let Some(saved) = form.saved() {
        print_record(session, saved);
    }
    Ok(())
}

// ── delete / transition ─────────────────────────────────────────────

pub async fn delete<E: Entity>(session: &Session<'_>, args: &RecordArgs) -> Result<(), CliError> {
    util::require_confirmation(session.global, "delete")?;
    let detail = open_detail::<E>(session, &args.id).await?;
    session.settle(detail.remove().await)
}

pub async fn transition<E: Entity>(
    session: &Session<'_>,
    args: &TransitionArgs,
) -> Result<(), CliError> {
    util::require_confirmation(session.global, "transition")?;
    let detail = open_detail::<E>(session, &args.id).await?;
    let outcome = detail.transition_status(&args.status).await;
    session.settle(outcome)?;

    if outcome.is_applied() {
        if let Some(record) = detail.record() {
            print_record(session, &record);
        }
    }
    Ok(())
}
