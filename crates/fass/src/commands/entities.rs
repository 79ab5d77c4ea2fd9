//! Entity command handlers: list, on/off, toggle, check.

use fass_core::{Domain, EntityId, Service, Session, ToggleCommand, ToggleViewModel};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{DomainFilter, EntityArgs, GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Entity")]
    entity_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "State")]
    state: String,
}

impl EntityRow {
    fn new(vm: &ToggleViewModel, color: bool) -> Self {
        Self {
            entity_id: vm.entity_id.to_string(),
            name: vm.display_name.clone(),
            domain: vm.domain.to_string(),
            state: output::paint_state(vm.is_on, color),
        }
    }
}

impl From<DomainFilter> for Domain {
    fn from(filter: DomainFilter) -> Self {
        match filter {
            DomainFilter::Light => Domain::Light,
            DomainFilter::Switch => Domain::Switch,
        }
    }
}

fn parse_entity_id(raw: &str) -> Result<EntityId, CliError> {
    raw.parse().map_err(|e: fass_core::EntityIdError| CliError::Validation {
        field: "entity_id".into(),
        reason: e.to_string(),
    })
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn list(session: &Session, args: &ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let domain = args.domain.map(Domain::from);
    let cards: Vec<ToggleViewModel> = session
        .view_models()
        .into_iter()
        .filter(|vm| domain.is_none_or(|d| vm.domain == d))
        .collect();

    let color = output::should_color(global.color);
    let out = output::render_list(global.output, &cards, |vm| EntityRow::new(vm, color))?;
    output::print_output(&out);
    Ok(())
}

#[derive(Serialize)]
struct Applied<'a> {
    entity_id: &'a EntityId,
    service: &'static str,
}

pub async fn set_state(
    session: &Session,
    args: &EntityArgs,
    desired_state: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entity_id = parse_entity_id(&args.entity_id)?;
    let command = ToggleCommand::new(entity_id, desired_state);
    let service = command.service();

    let outcome = session.apply(command).await;
    outcome.result?;

    report(&outcome.command.entity_id, service, global)
}

pub async fn toggle(
    session: &Session,
    args: &EntityArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entity_id = parse_entity_id(&args.entity_id)?;
    session.send(&entity_id, Service::Toggle).await?;
    report(&entity_id, Service::Toggle, global)
}

fn report(entity_id: &EntityId, service: Service, global: &GlobalOpts) -> Result<(), CliError> {
    let applied = Applied {
        entity_id,
        service: service.as_str(),
    };
    let out = output::render_single(global.output, &applied, |a| {
        format!("{}: {}", a.entity_id, a.service)
    })?;
    output::print_output(&out);
    Ok(())
}

#[derive(Serialize)]
struct HubStatus {
    url: String,
    lights: Option<usize>,
    switches: Option<usize>,
}

/// Report reachability. Only the probe decides success; entity counts are
/// shown when the states could be loaded too.
pub async fn check(global: &GlobalOpts) -> Result<(), CliError> {
    let (session, _notices, load_error) = super::probe(global).await?;
    if let Some(e) = &load_error {
        super::print_warning(&format!("hub answered but entities could not be loaded: {e}"), global);
    }

    let snapshot = session.snapshot();
    let loaded = load_error.is_none();
    let status = HubStatus {
        url: session.hub().base_url().to_string(),
        lights: loaded.then(|| snapshot.lights().len()),
        switches: loaded.then(|| snapshot.switches().len()),
    };
    let count = |n: Option<usize>| n.map_or_else(|| "-".to_owned(), |n| n.to_string());
    let out = output::render_single(global.output, &status, |s| {
        [
            format!("Hub:      {} (reachable)", s.url),
            format!("Lights:   {}", count(s.lights)),
            format!("Switches: {}", count(s.switches)),
        ]
        .join("\n")
    })?;
    output::print_output(&out);
    Ok(())
}
