// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `hvac-ir-bridge` binary.
//!
//! Usage: `hvac-ir-bridge [config.json]`. Without an argument the path is
//! taken from `HVAC_BRIDGE_CONFIG`; without either, defaults are used.
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use hvac_ir_bridge::config::{BridgeConfig, CONFIG_PATH_ENV, IrBackend};
use hvac_ir_bridge::ir::{IrTransmitter, LogTransmitter, TasmotaIrHvac};
use hvac_ir_bridge::Bridge;

#[tokio::main(flavor = "current_thread")]
async fn main() -> hvac_ir_bridge::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match config_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading configuration");
            BridgeConfig::load(&path)?
        }
        None => BridgeConfig::default(),
    };

    let transport = config.mqtt_transport()?;
    let transmitter: Box<dyn IrTransmitter> = match &config.ir {
        IrBackend::Log => Box::new(LogTransmitter::new()),
        IrBackend::Tasmota { topic } => Box::new(TasmotaIrHvac::new(transport.client(), topic)),
    };

    let mut bridge = Bridge::new(transport, transmitter, config.bridge_settings());
    bridge.run().await;
    Ok(())
}

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV))
        .map(PathBuf::from)
}
