//! Host-side hub emulator.
//!
//! Wires the routing core to fake pins and a fake radio so the full
//! attach → connect → announce → command flow can be exercised without
//! hardware. Commands come from a script (one per line) or a built-in
//! demo session.

mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use hub_core::{Controller, Project, StaticCapabilities};
use hub_model::GuidSource;
use hub_shared::fake::{FakeNetwork, FakePins};
use hub_shared::pins::HIGH;

use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "hub-emu", about = "Run the project hub against fake hardware")]
struct Args {
    /// Path to a JSON settings file (all keys required when present).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Path to a command script, one protocol line per line of the file.
    #[arg(long)]
    script: Option<PathBuf>,
}

/// Command lines used when no script is given.
const DEMO_SESSION: &[&str] = &[
    "1 PINMODE 9 OUTPUT",
    "2 DIGITALWRITE 9 HIGH",
    "3 DELAY 100",
    "4 ANALOGREAD 2",
    "5 DIGITALREAD 13",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    log::info!("starting {} (guid seed {})", settings.device_name, settings.guid_seed);

    let script = match &args.script {
        Some(path) => std::fs::read_to_string(path)?
            .lines()
            .map(str::to_string)
            .collect(),
        None => DEMO_SESSION.iter().map(|line| line.to_string()).collect::<Vec<_>>(),
    };

    // Fake hardware: pin 13 reads high, pin 2 carries a sensor value.
    let mut pins = FakePins::new();
    pins.set_digital_level(13, HIGH);
    pins.set_analog_value(2, 512);

    let network = FakeNetwork::new();
    let air = network.record();

    let controller = Arc::new(Controller::with_network(Box::new(pins), Box::new(network)));

    let mut guids = GuidSource::new(settings.guid_seed);
    let guid = guids.next_guid();
    let project = Project::attach_local(
        controller.clone(),
        guid.clone(),
        1,
        1,
        Box::new(StaticCapabilities::none()),
    );
    controller.log_attached_projects();

    // Bring up the (fake) wireless session and announce the project.
    let connect = controller.connect_to_network();
    match connect.session {
        Some(session) => {
            project.set_host_session(session.clone());
            let announce = project.try_connect_to_server();
            log::info!("announcement sent: {}", announce.is_successful);

            // A peer device shows up as a remote proxy related to ours.
            let peer = Project::new_remote(
                session,
                guids.next_guid(),
                2,
                1,
                Box::new(StaticCapabilities::none()),
            );
            project.attach_related_project(peer);
            project.log_related_projects();
        }
        None => log::warn!("running without a host session"),
    }

    // Deliver each scripted line through the interrupt path, the way a
    // real controller would on inbound radio traffic.
    for line in &script {
        if line.is_empty() {
            continue;
        }
        controller.send_to_project(line, &guid)?;
    }

    println!("device: {}", settings.device_name);
    println!("project: {guid}");
    for message in air.server_messages() {
        println!("to server: {message}");
    }

    project.detach()?;
    Ok(())
}
