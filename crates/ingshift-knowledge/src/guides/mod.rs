//! Per-target remediation guides

use ingshift_model::Target;

use crate::entry::AnnotationGuide;

mod gateway;
mod traefik;

pub(crate) fn guides(target: Target) -> &'static [(&'static str, AnnotationGuide)] {
    match target {
        Target::Traefik => traefik::GUIDES,
        Target::GatewayApi => gateway::GUIDES,
    }
}
