//! Controller bootstrap and main loop
//!
//! Actors start in dependency order: persistence first (configuration and
//! presets are fetched with blocking requests), then the outputs, the
//! selector, the foot switch and finally the web server.

use anyhow::{bail, Context, Result};
use footlight_control::storage::{FileStore, PersistenceActor};
use footlight_control::{
    ArtNetActor, ArtNetSender, ControlHandle, OscActor, OscSender, SevenSegmentDisplay,
    TracingSegmentDriver, WebServer,
};
use footlight_core::footswitch::{edge_channel, EdgeInterrupt, InputPin};
use footlight_core::{
    mailbox, spawn, Actor, Address, DeviceConfig, FootSwitch, FootSwitchActor, Mailbox, Message,
    Preset, PresetBank, PresetSelector, SelectorTargets, Tagged,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::settings::ControllerSettings;
use crate::simulator::SwitchSimulator;

/// A booted controller
pub struct Controller<P: InputPin> {
    pub selector: Address<Message>,
    /// Configuration the foot switch pipeline was built with
    pub config: DeviceConfig,
    /// Interrupt handler of the foot switch pin
    pub interrupt: EdgeInterrupt<P>,
    /// Receives `OtaRequested` from the foot switch
    pub ota_requests: Mailbox<Message>,
    pub web: JoinHandle<footlight_control::Result<()>>,
}

/// Fetch the stored configuration; any persistence error means defaults.
pub async fn request_configuration(persistence: &Address<Message>) -> Result<DeviceConfig> {
    let response = persistence
        .request(
            |reply_to| Message::RequestConfiguration { reply_to },
            Message::CONFIGURATION_RESPONSE,
        )
        .await
        .context("Configuration handshake with persistence failed")?;

    match response {
        Message::ConfigurationResponse(Ok(config)) => {
            tracing::info!(
                "Loaded configuration: polarity inverted={}, long press={}ms",
                config.switch_polarity_inverted,
                config.long_press_threshold_ms
            );
            Ok(config)
        }
        Message::ConfigurationResponse(Err(e)) => {
            tracing::warn!("No stored configuration ({}), using defaults", e);
            Ok(DeviceConfig::default())
        }
        other => bail!("Unexpected configuration response: {}", other.tag()),
    }
}

/// Fetch the stored presets; `None` when nothing usable is stored.
pub async fn request_presets(persistence: &Address<Message>) -> Result<Option<Vec<Preset>>> {
    let response = persistence
        .request(
            |reply_to| Message::RequestPresets { reply_to },
            Message::PRESETS_RESPONSE,
        )
        .await
        .context("Preset handshake with persistence failed")?;

    match response {
        Message::PresetsResponse(Ok(presets)) => {
            tracing::info!("Loaded {} presets", presets.len());
            Ok(Some(presets))
        }
        Message::PresetsResponse(Err(e)) => {
            tracing::warn!("No stored presets ({}), starting with a cleared bank", e);
            Ok(None)
        }
        other => bail!("Unexpected presets response: {}", other.tag()),
    }
}

/// Start every actor and the web server.
pub async fn boot<P: InputPin>(
    settings: &ControllerSettings,
    pin: Arc<P>,
) -> Result<Controller<P>> {
    let queues = &settings.queues;

    // Persistence and startup handshakes
    let store = FileStore::open(&settings.storage_directory)
        .with_context(|| format!("Failed to open storage {:?}", settings.storage_directory))?;
    let (persistence, persistence_rx) =
        mailbox(PersistenceActor::<FileStore>::NAME, queues.persistence)?;
    spawn(PersistenceActor::new(store), persistence_rx);

    let config = request_configuration(&persistence).await?;
    let stored_presets = request_presets(&persistence).await?;

    // Outputs
    let (display, display_rx) = mailbox("display", queues.display)?;
    spawn(SevenSegmentDisplay::new(TracingSegmentDriver), display_rx);

    let mut artnet_sender =
        ArtNetSender::new(&settings.artnet_target).context("Invalid Art-Net target")?;
    artnet_sender.init().context("Failed to open Art-Net socket")?;
    let (artnet, artnet_rx) = mailbox(ArtNetActor::NAME, queues.artnet)?;
    spawn(ArtNetActor::new(artnet_sender), artnet_rx);

    let mut osc_sender = OscSender::new(&settings.osc_target, &settings.osc_prefix)
        .context("Invalid OSC target")?;
    osc_sender.init().context("Failed to open OSC socket")?;
    let (osc, osc_rx) = mailbox(OscActor::NAME, queues.osc)?;
    spawn(OscActor::new(osc_sender), osc_rx);

    // Selector
    let mut bank = PresetBank::new();
    if let Some(presets) = stored_presets {
        if let Err(e) = bank.replace_all(&presets) {
            tracing::warn!("Stored presets rejected ({}), starting with a cleared bank", e);
            bank.clear_all();
        }
    }
    let selector_actor = PresetSelector::new(
        bank,
        SelectorTargets {
            artnet,
            osc,
            display,
        },
    );
    selector_actor.publish_current();
    let (selector, selector_rx) = mailbox(PresetSelector::NAME, queues.selector)?;
    spawn(selector_actor, selector_rx);

    // Foot switch
    let (edge_sender, edges) = edge_channel(queues.edges)?;
    let interrupt = EdgeInterrupt::new(pin, config, edge_sender);
    let pressed_at_boot = interrupt.is_pressed();
    let (ota, ota_requests) = mailbox("controller", queues.controller)?;
    let switch = FootSwitch::new(&config, pressed_at_boot, Instant::now());
    tracing::info!("Foot switch started in state {}", switch.state().as_str());
    spawn(FootSwitchActor::new(switch, selector.clone(), Some(ota)), edges);

    // Web
    let control = ControlHandle::new(selector.clone(), persistence);
    let web = WebServer::new(settings.web.clone(), control).spawn();

    Ok(Controller {
        selector,
        config,
        interrupt,
        ota_requests,
        web,
    })
}

/// Boot and run until Ctrl-C.
pub async fn run(settings: ControllerSettings) -> Result<()> {
    let pin = Arc::new(footlight_core::SimulatedPin::default());
    let Controller {
        config,
        interrupt,
        mut ota_requests,
        mut web,
        ..
    } = boot(&settings, pin.clone()).await?;

    // Without the simulator the interrupt stays bound for the lifetime of the loop
    let _interrupt = if settings.simulator {
        SwitchSimulator::new(pin, interrupt, config).spawn()?;
        None
    } else {
        Some(interrupt)
    };

    tracing::info!("--- Controller running ---");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                break;
            }
            result = &mut web => {
                match result {
                    Ok(Ok(())) => {
                        tracing::warn!("Web server stopped");
                        break;
                    }
                    Ok(Err(e)) => return Err(e).context("Web server failed"),
                    Err(e) => return Err(e).context("Web server task aborted"),
                }
            }
            message = ota_requests.receive() => match message {
                Some(Message::OtaRequested) => {
                    tracing::info!("OTA update requested, handing over to the updater");
                }
                Some(other) => tracing::warn!("Controller ignoring {}", other.tag()),
                None => break,
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use footlight_control::storage::NvsStorage;
    use footlight_core::SimulatedPin;
    use std::time::Duration;
    use tokio::net::UdpSocket;

    async fn artnet_packet(socket: &UdpSocket) -> Vec<u8> {
        let mut buf = [0u8; 1024];
        let (len, _) = tokio::time::timeout(Duration::from_secs(2), socket.recv_from(&mut buf))
            .await
            .expect("no Art-Net packet")
            .unwrap();
        buf[..len].to_vec()
    }

    async fn settings(dir: &std::path::Path) -> (ControllerSettings, UdpSocket, UdpSocket) {
        let artnet = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let osc = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let mut settings = ControllerSettings::default();
        settings.artnet_target = artnet.local_addr().unwrap().to_string();
        settings.osc_target = osc.local_addr().unwrap().to_string();
        settings.storage_directory = dir.to_path_buf();
        settings.simulator = false;
        settings.web.port = 0;
        (settings, artnet, osc)
    }

    #[tokio::test]
    async fn test_boot_with_empty_storage_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, artnet, _osc) = settings(dir.path()).await;

        let controller = boot(&settings, Arc::new(SimulatedPin::default()))
            .await
            .unwrap();
        assert_eq!(controller.config, DeviceConfig::default());

        // A cleared bank has empty universes, so nothing goes out on Art-Net
        let mut buf = [0u8; 1024];
        let received =
            tokio::time::timeout(Duration::from_millis(200), artnet.recv_from(&mut buf)).await;
        assert!(received.is_err());
    }

    #[tokio::test]
    async fn test_boot_restores_presets_and_selects() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut storage = NvsStorage::new(FileStore::open(dir.path()).unwrap());
            storage.store_config(&DeviceConfig::new(false, 700)).unwrap();
            storage
                .store_presets(&[
                    Preset::with_data(0, "Front", &[10, 20], &[]),
                    Preset::with_data(1, "Back", &[30], &[]),
                ])
                .unwrap();
        }
        let (settings, artnet, _osc) = settings(dir.path()).await;

        let controller = boot(&settings, Arc::new(SimulatedPin::default()))
            .await
            .unwrap();
        assert_eq!(controller.config.long_press_threshold_ms, 700);

        // Preset 0 is published at boot
        let packet = artnet_packet(&artnet).await;
        assert_eq!(packet.len(), 18 + 2);
        assert_eq!(&packet[18..20], &[10, 20]);

        controller.selector.send(Message::SelectNext).unwrap();
        let packet = artnet_packet(&artnet).await;
        assert_eq!(packet[18], 30);
    }
}
