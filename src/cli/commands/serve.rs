//! Relay server command.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::Result;
use crate::relay::{self, RelayConfig};

/// Run the relay until Ctrl-C
pub fn cmd_serve(rt: &Runtime, config: Config) -> Result<()> {
    let relay_config = RelayConfig {
        bind: config.server.bind,
        upload_dir: config.server.upload_dir,
        credentials: config.credentials,
    };

    rt.block_on(relay::serve(relay_config))
}
