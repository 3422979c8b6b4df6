// Application state module
// Everything a request needs, built once at startup

use super::types::Config;
use crate::handler::static_files::StaticSite;
use crate::routing::FrontDoor;

/// Application state
pub struct AppState {
    pub config: Config,
    pub front_door: FrontDoor,
    pub site: StaticSite,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            front_door: FrontDoor::from_config(config),
            site: StaticSite::new(&config.site.root, config.site.index_files.clone()),
        }
    }
}
