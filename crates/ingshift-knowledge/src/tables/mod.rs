//! Per-target compatibility tables

use ingshift_model::Target;

use crate::entry::CompatibilityEntry;

mod gateway;
mod traefik;

pub(crate) fn entries(target: Target) -> &'static [(&'static str, CompatibilityEntry)] {
    match target {
        Target::Traefik => traefik::ENTRIES,
        Target::GatewayApi => gateway::ENTRIES,
    }
}
