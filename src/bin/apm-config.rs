//! apm-config - load an audio policy configuration and print its graph.

use std::path::PathBuf;

use anyhow::Context;
use audio_policy_config::model::{HwModule, PortKind};
use audio_policy_config::{AudioPolicyConfig, LoadOptions};
use clap::Parser;
use itertools::Itertools;

#[derive(Parser)]
#[command(name = "apm-config")]
#[command(author, version, about = "Audio policy configuration loader", long_about = None)]
struct Cli {
    /// Path to the audio policy configuration XML
    file: PathBuf,

    /// Move A2DP playback from the primary module to the a2dp module
    /// (also enabled by APM_DISABLE_A2DP_OFFLOAD=1)
    #[arg(long)]
    disable_a2dp_offload: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let mut options = LoadOptions::from_env();
    if cli.disable_a2dp_offload {
        options = options.with_disable_a2dp_offload(true);
    }

    let config = AudioPolicyConfig::load(&cli.file, options)
        .with_context(|| format!("Failed to load {}", cli.file.display()))?;

    print_config(&config);
    Ok(())
}

fn print_config(config: &AudioPolicyConfig) {
    if let Some(source) = config.source() {
        println!("File: {}", source.display());
    }

    let global = config.global();
    println!("Speaker DRC:      {}", global.speaker_drc_enabled);
    println!("Call screen mode: {}", global.call_screen_mode_supported);
    if let Some(suffix) = &global.engine_library_suffix {
        println!("Engine library:   {}", suffix);
    }
    if let Some((module, port)) = config.default_output_device() {
        println!("Default output:   {}/{}", module.name(), port.tag_name);
    }

    for module in config.modules().iter() {
        println!();
        print_module(module);
    }

    println!();
    println!("Surround formats:");
    for (format, subformats) in config.surround_formats() {
        if subformats.is_empty() {
            println!("  {}", format);
        } else {
            println!("  {} [{}]", format, subformats.iter().join(" "));
        }
    }
}

fn print_module(module: &HwModule) {
    println!("Module {} (HAL {})", module.name(), module.version());

    for (_, port) in module.ports() {
        let detail = match &port.kind {
            PortKind::Mix(mix) => format!(
                "mix    {} max open {} active {}",
                mix.flags, mix.max_open_count, mix.max_active_count
            ),
            PortKind::Device(device) if device.address.is_empty() => {
                format!("device {}", device.device_type)
            }
            PortKind::Device(device) => {
                format!("device {} @{}", device.device_type, device.address)
            }
        };
        println!("  {:<28} {:<6} {}", port.tag_name, port.role.as_str(), detail);
        for profile in &port.profiles {
            if profile.is_full_dynamic() {
                println!("      profile <dynamic>");
            } else {
                println!(
                    "      profile {} [{}] [{}]",
                    profile.format,
                    profile.channel_masks.iter().join(","),
                    profile.sample_rates.iter().join(",")
                );
            }
        }
        for gain in &port.gains {
            println!(
                "      gain #{} {} [{}, {}] mB",
                gain.index, gain.mode, gain.min_value_mb, gain.max_value_mb
            );
        }
    }

    for (_, route) in module.routes() {
        let sources = route
            .sources()
            .iter()
            .filter_map(|id| module.tag_name(*id))
            .join(", ");
        println!(
            "  route {} {} <- {}",
            route.route_type.as_str(),
            module.tag_name(route.sink()).unwrap_or_default(),
            sources
        );
    }

    let attached = module
        .attached_devices()
        .map(|(_, port)| port.tag_name.as_str())
        .join(", ");
    if !attached.is_empty() {
        println!("  attached: {}", attached);
    }
}
