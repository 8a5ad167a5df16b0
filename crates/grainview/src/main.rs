//! `grainview` - CLI for browsing grain-size sample data
//!
//! This binary loads the configured sample collection and prints the table,
//! dashboard, report, and map views, exports CSV, and manages the local
//! device registry, settings, and theme.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{debug, warn};

use grainview::cli::{
    Cli, Command, ConfigCommand, DevicesCommand, ExportCommand, OutputFormat, SettingsCommand,
    TableCommand, ThemeCommand,
};
use grainview::dataset::LoadState;
use grainview::devices::{DeviceDraft, DeviceRegistry};
use grainview::{export, stats, view};
use grainview::{init_logging, Config, Sample, Settings, Storage, ThemeState};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Table(cmd) => handle_table(&config, &cmd),
        Command::Types => handle_types(&config),
        Command::Dashboard(cmd) => handle_dashboard(&config, cmd.json),
        Command::Report(cmd) => handle_report(&config, cmd.json),
        Command::Map(cmd) => handle_map(&config, cmd.json),
        Command::Export(cmd) => handle_export(&config, cmd),
        Command::Devices(cmd) => handle_devices(&config, cmd),
        Command::Settings(cmd) => handle_settings(&config, cmd),
        Command::Theme(cmd) => handle_theme(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Load the configured dataset, failing with its error message.
fn load_samples(config: &Config) -> Result<LoadState> {
    let state = LoadState::load(config.samples_path());
    if let Some(message) = state.error_message() {
        bail!("sample data unavailable: {message}");
    }
    Ok(state)
}

fn open_store(config: &Config) -> Result<Storage> {
    let path = config.database_path();
    Storage::open(&path).with_context(|| format!("failed to open local store {}", path.display()))
}

fn handle_table(config: &Config, cmd: &TableCommand) -> Result<()> {
    let state = load_samples(config)?;
    let samples = state.samples();
    let page_size = config.view.page_size;

    let mut params = config.initial_view();
    if let Some(query) = &cmd.query {
        params.query.clone_from(query);
    }
    if let Some(beach_type) = &cmd.beach_type {
        params.category = beach_type.parse().unwrap_or_default();
    }
    match cmd.sort {
        Some(sort) => params.select_sort(sort.into(), cmd.direction()),
        None => {
            if let Some(direction) = cmd.direction() {
                params.direction = direction;
            }
        }
    }
    params.page = cmd.page;

    let matching = samples.iter().filter(|s| params.matches(s)).count();
    let requested = params.page;
    if params.clamp_page(view::total_pages(matching, page_size)) {
        warn!("Page {} out of range, showing page {}", requested, params.page);
    }

    let page = view::apply(samples, &params, page_size);
    debug!(
        "Showing {} of {} matching samples",
        page.records.len(),
        page.total_filtered
    );

    match cmd.format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "page": page.page,
                "total_pages": page.total_pages,
                "total_filtered": page.total_filtered,
                "records": page.records,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            println!(
                "{:<32} {:<10} {:>10} {:>8} {:>8}  {:<8} {:<10}",
                "Location", "Date", "Grain (mm)", "Temp °C", "Hum %", "Device", "Type"
            );
            println!("{}", "-".repeat(96));
            for sample in &page.records {
                print_table_row(sample, &config.export.date_format);
            }
            println!();
            println!(
                "Page {} of {} ({} samples)",
                page.page, page.total_pages, page.total_filtered
            );
        }
        OutputFormat::Plain => {
            for sample in &page.records {
                println!(
                    "{}\t{}\t{}\t{}",
                    sample.id, sample.location, sample.device_id, sample.grain_size
                );
            }
        }
    }
    Ok(())
}

fn print_table_row(sample: &Sample, date_format: &str) {
    println!(
        "{:<32} {:<10} {:>10.3} {:>8.1} {:>8.1}  {:<8} {:<10}",
        truncate(&sample.location, 32),
        sample.timestamp.format(date_format).to_string(),
        sample.grain_size,
        sample.temperature,
        sample.humidity,
        sample.device_id,
        sample.beach_type
    );
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

fn handle_types(config: &Config) -> Result<()> {
    let state = load_samples(config)?;
    println!("{}", view::ALL_CATEGORIES);
    for category in grainview::dataset::categories(state.samples()) {
        println!("{category}");
    }
    Ok(())
}

fn handle_dashboard(config: &Config, json: bool) -> Result<()> {
    let state = load_samples(config)?;
    let samples = state.samples();

    let series = stats::grain_size_series(samples, stats::DASHBOARD_SERIES_LEN);
    let distribution = stats::category_distribution(samples);
    let avg_grain = stats::average(samples.iter().map(|s| s.grain_size));
    let avg_temp = stats::average(samples.iter().map(|s| s.temperature));
    let avg_humidity = stats::average(samples.iter().map(|s| s.humidity));

    if json {
        let out = serde_json::json!({
            "total_samples": samples.len(),
            "avg_grain_size": avg_grain,
            "avg_temperature": avg_temp,
            "avg_humidity": avg_humidity,
            "beach_types": distribution,
            "grain_size_series": series,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Dashboard");
    println!("=========");
    println!("Total samples:        {}", samples.len());
    println!("Average grain size:   {avg_grain:.3} mm");
    println!("Average temperature:  {avg_temp:.1} °C");
    println!("Average humidity:     {avg_humidity:.1} %");
    println!();
    println!("Beach types");
    for entry in &distribution {
        println!("  {:<20} {:>5}  {:>5.1}%", entry.name, entry.count, entry.percent);
    }
    println!();
    println!("Grain size (first {})", series.len());
    for point in &series {
        println!("  {:<24} {:>7.3} mm  {}", point.label, point.grain_size, point.state);
    }
    Ok(())
}

fn handle_report(config: &Config, json: bool) -> Result<()> {
    let state = load_samples(config)?;
    let summary = stats::summarize(state.samples());

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!(
            "{}",
            export::render_report(summary.as_ref(), &config.export.date_format)
        );
    }
    Ok(())
}

fn handle_map(config: &Config, json: bool) -> Result<()> {
    let state = load_samples(config)?;
    let markers = stats::map_markers(state.samples());

    if json {
        println!("{}", serde_json::to_string_pretty(&markers)?);
        return Ok(());
    }

    for marker in &markers {
        println!(
            "{:<8} {:>10.4} {:>10.4} {:>7.3} mm  {} ({})",
            marker.id.to_string(),
            marker.latitude,
            marker.longitude,
            marker.grain_size,
            marker.class.label(),
            marker.class.color()
        );
    }
    Ok(())
}

fn handle_export(config: &Config, cmd: ExportCommand) -> Result<()> {
    let state = load_samples(config)?;
    let today = Utc::now().date_naive();
    let date_format = &config.export.date_format;

    let (output, file_name, contents) = match cmd {
        ExportCommand::Csv { output } => (
            output,
            export::csv_file_name(today),
            export::to_csv(state.samples(), date_format),
        ),
        ExportCommand::Report { output } => (
            output,
            export::report_file_name(today),
            export::render_report(stats::summarize(state.samples()).as_ref(), date_format),
        ),
    };

    let dir = output.unwrap_or_else(|| config.export.output_dir.clone());
    let path = export::write_export(&dir, &file_name, &contents)
        .with_context(|| format!("failed to export to {}", dir.display()))?;
    println!("Exported {} samples to {}", state.samples().len(), path.display());
    Ok(())
}

fn handle_devices(config: &Config, cmd: DevicesCommand) -> Result<()> {
    let store = open_store(config)?;
    let state = LoadState::load(config.samples_path());
    let (mut registry, source) = DeviceRegistry::bootstrap(
        &store,
        config.data.devices_path.as_deref(),
        state.samples(),
    )?;
    debug!("Device registry from {:?}", source);

    match cmd {
        DevicesCommand::List { search, json } => {
            let devices: Vec<_> = match &search {
                Some(query) => registry.search(query),
                None => registry.devices().iter().collect(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&devices)?);
            } else {
                println!(
                    "{:<14} {:<10} {:<32} {:<16} {:<8}",
                    "ID", "Device", "Location", "State", "Status"
                );
                for device in devices {
                    println!(
                        "{:<14} {:<10} {:<32} {:<16} {:<8}",
                        device.id,
                        device.device_id,
                        truncate(&device.location, 32),
                        device.state,
                        device.status.to_string()
                    );
                }
            }
            return Ok(());
        }
        DevicesCommand::Add {
            device_id,
            location,
            state,
            status,
        } => {
            let device = registry.add(DeviceDraft {
                device_id,
                location,
                state,
                status: status.into(),
            })?;
            println!("Added device {} as {}", device.device_id, device.id);
        }
        DevicesCommand::Update {
            id,
            device_id,
            location,
            state,
            status,
        } => {
            let Some(current) = registry.get(&id) else {
                bail!("no device with id {id}");
            };
            let draft = DeviceDraft {
                device_id: device_id.unwrap_or_else(|| current.device_id.clone()),
                location: location.unwrap_or_else(|| current.location.clone()),
                state: state.unwrap_or_else(|| current.state.clone()),
                status: status.map_or(current.status, Into::into),
            };
            let device = registry.update(&id, draft)?;
            println!("Updated device {}", device.id);
        }
        DevicesCommand::Remove { id } => {
            let device = registry.remove(&id)?;
            println!("Removed device {} ({})", device.device_id, device.id);
        }
    }

    registry.save(&store)?;
    Ok(())
}

fn handle_settings(config: &Config, cmd: SettingsCommand) -> Result<()> {
    let store = open_store(config)?;

    match cmd {
        SettingsCommand::Show { json } => {
            let settings = Settings::load(&store)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                println!("Notifications");
                println!("  Email:            {}", settings.notifications.email);
                println!("  Push:             {}", settings.notifications.push);
                println!("  SMS:              {}", settings.notifications.sms);
                println!("Data retention:     {}", settings.data_retention);
                println!("Auto sync:          {}", settings.auto_sync);
                println!("Language:           {}", settings.language.display_name());
            }
        }
        SettingsCommand::Set { key, value } => {
            let mut settings = Settings::load(&store)?;
            settings.set(&key, &value)?;
            settings.save(&store)?;
            println!("{key} = {value}");
        }
        SettingsCommand::Reset => {
            Settings::reset(&store)?;
            println!("Settings restored to defaults.");
        }
    }
    Ok(())
}

fn handle_theme(config: &Config, cmd: &ThemeCommand) -> Result<()> {
    let store = open_store(config)?;
    let mut theme = ThemeState::load(&store)?;
    if matches!(cmd, ThemeCommand::Toggle) {
        theme.toggle(&store)?;
    }
    println!("{}", theme.name());
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let samples_path = config.samples_path();
    let state = LoadState::load(&samples_path);
    let store = open_store(config)?;
    let store_stats = store.stats()?;
    let fingerprint = state.dataset().map(grainview::Dataset::fingerprint);

    if json {
        let status = serde_json::json!({
            "samples_path": samples_path,
            "load_state": state.label(),
            "error": state.error_message(),
            "fingerprint": fingerprint,
            "sample_count": state.samples().len(),
            "database_path": store.path(),
            "store_entries": store_stats.total_entries,
            "store_last_updated": store_stats.last_updated,
            "store_size_bytes": store_stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("grainview status");
    println!("----------------");
    println!("Samples:       {}", samples_path.display());
    println!("State:         {}", state.label());
    if let Some(message) = state.error_message() {
        println!("Error:         {message}");
    }
    if let Some(fingerprint) = fingerprint {
        println!("Fingerprint:   {fingerprint}");
    }
    println!("Sample count:  {}", state.samples().len());
    println!("Local store:   {}", store.path().display());
    println!("  Entries:     {}", store_stats.total_entries);
    if let Some(last) = store_stats.last_updated {
        println!("  Updated:     {}", last.to_rfc3339());
    }
    println!("  Size:        {} bytes", store_stats.db_size_bytes);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Data]");
                println!("  Samples path:   {}", config.samples_path().display());
                match &config.data.devices_path {
                    Some(path) => println!("  Devices path:   {}", path.display()),
                    None => println!("  Devices path:   (derived from samples)"),
                }
                println!();
                println!("[View]");
                println!("  Page size:      {}", config.view.page_size);
                println!("  Sort key:       {}", config.view.sort_key);
                println!("  Sort direction: {}", config.view.sort_direction);
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Export]");
                println!("  Output dir:     {}", config.export.output_dir.display());
                println!("  Date format:    {}", config.export.date_format);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
