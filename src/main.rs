use std::env;
use std::process::exit;

use serde_json::{Map, Value};

use pixdeck::api::{ApiClient, ApiError, Reply};
use pixdeck::config::{Settings, resolve_board_url};
use pixdeck::ui::show_dashboard;
use pixdeck::utils::{format_bytes, format_uptime};

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();

    // --url can appear anywhere before or after the subcommand
    let mut url_flag: Option<String> = None;
    if let Some(pos) = args.iter().position(|a| a == "--url") {
        if pos + 1 >= args.len() {
            eprintln!("⚠ --url requires a value");
            exit(2);
        }
        url_flag = Some(args.remove(pos + 1));
        args.remove(pos);
    }

    if args.is_empty() {
        print_usage();
        exit(2);
    }
    let command = args.remove(0);

    if command == "use" {
        run_use(&args);
        return;
    }

    let Some(url) = resolve_board_url(url_flag.as_deref()) else {
        eprintln!("⚠ No board URL configured");
        eprintln!("  Pass --url <url>, set PIXDECK_URL, or run: pixdeck use <url>");
        exit(2);
    };
    let client = ApiClient::new(&url);

    if command == "ui" {
        if let Err(e) = show_dashboard(client) {
            eprintln!("UI Error: {}", e);
            exit(1);
        }
        return;
    }

    let result = match command.as_str() {
        "status" => show_status(&client),
        "health" => show_health(&client),
        "about" => show_about(&client),
        "diag" => show_diag(&client),
        "zones" => show_zones(&client),
        "config" => run_config(&client, &args),
        _ => {
            eprintln!("⚠ Unknown command: {}", command);
            print_usage();
            exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("⚠ {}", e);
        exit(1);
    }
}

fn print_usage() {
    println!("pixdeck - terminal companion for pixel-display boards");
    println!();
    println!("Usage: pixdeck [--url <url>] <command>");
    println!();
    println!("Commands:");
    println!("  status                 Firmware and memory snapshot");
    println!("  health                 Reboot cause and Wi-Fi counters");
    println!("  about                  Board identity");
    println!("  diag                   Heap trend and recent events");
    println!("  zones                  Timezone database");
    println!("  config                 Show system config");
    println!("  config set <k=v>...    Update system config fields");
    println!("  use <url>              Save the default board URL");
    println!("  ui                     Live dashboard");
}

// ============================================================================
// COMMANDS
// ============================================================================

fn run_use(args: &[String]) {
    let Some(url) = args.first() else {
        eprintln!("⚠ use requires a board URL");
        exit(2);
    };
    let mut settings = Settings::load();
    settings.board_url = Some(url.trim_end_matches('/').to_string());
    match settings.save() {
        Ok(()) => println!("✓ Default board set to {}", url),
        Err(e) => {
            eprintln!("⚠ Failed to save settings: {}", e);
            exit(1);
        }
    }
}

fn show_status(client: &ApiClient) -> Result<(), ApiError> {
    let status = client.status()?;
    println!("✓ Board {}", client.base_url());
    println!("  Firmware:    {}", status.firmware_version);
    if let Some(mac) = &status.mac {
        println!("  MAC:         {}", mac);
    }
    println!("  Free heap:   {}", format_bytes(status.free_heap));
    println!("  Free SPIRAM: {}", format_bytes(status.free_spiram));
    println!("  Min heap:    {}", format_bytes(status.min_free_heap));
    println!("  Images:      {}", status.images_loaded);
    match status.temperature_c {
        Some(t) => println!("  Temp:        {:.1} °C", t),
        None => println!("  Temp:        n/a"),
    }
    println!(
        "  Diag events: {}",
        if status.diag_events_enabled { "on" } else { "off" }
    );
    Ok(())
}

fn show_health(client: &ApiClient) -> Result<(), ApiError> {
    let health = client.health()?;
    println!("✓ Board {}", client.base_url());
    println!("  Last boot:   {}", health.reboot_reason);
    match health.temperature_c {
        Some(t) => println!("  Temp:        {:.1} °C", t),
        None => println!("  Temp:        n/a"),
    }
    if let Some(wifi) = &health.wifi {
        println!(
            "  Wi-Fi:       {}",
            if wifi.connected {
                "connected"
            } else if wifi.connection_given_up {
                "given up"
            } else {
                "disconnected"
            }
        );
        println!("  Reconnects:  {}", wifi.reconnect_attempts);
        println!("  Disconnects: {}", wifi.disconnect_events);
    }
    Ok(())
}

fn show_about(client: &ApiClient) -> Result<(), ApiError> {
    let about = client.about()?;
    println!("✓ {} ({})", about.model, about.kind);
    println!("  Version: {}", about.version);
    Ok(())
}

fn show_diag(client: &ApiClient) -> Result<(), ApiError> {
    let diag = client.diag()?;
    println!("✓ Board {}", client.base_url());

    if let Some(uptime_ms) = diag.uptime_ms() {
        println!("  Uptime: {}", format_uptime(uptime_ms));
    }
    if let Some(point) = diag.heap_trend.last() {
        println!(
            "  Heap:   {} free, {} min",
            format_bytes(point.internal_free),
            format_bytes(point.internal_min)
        );
    }

    if diag.recent_events.is_empty() {
        println!("  No recent events");
    } else {
        println!("  Events:");
        for event in &diag.recent_events {
            println!(
                "    [{}] {:<12} {} ({})",
                event.level,
                event.formatted_uptime(),
                event.message,
                event.kind
            );
        }
    }

    if !diag.ota_history.is_empty() {
        println!("  OTA history:");
        for event in &diag.ota_history {
            println!("    {} {} ({})", event.kind, event.message, event.code);
        }
    }
    Ok(())
}

fn show_zones(client: &ApiClient) -> Result<(), ApiError> {
    match client.zonedb()? {
        Reply::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Reply::Text(text) => println!("{}", text),
    }
    Ok(())
}

fn run_config(client: &ApiClient, args: &[String]) -> Result<(), ApiError> {
    match args.first().map(String::as_str) {
        None | Some("get") => {
            let config = client.system_config()?;
            println!("✓ Board {}", client.base_url());
            println!("  hostname:            {}", config.hostname);
            println!("  timezone:            {}", config.timezone);
            println!("  auto_timezone:       {}", config.auto_timezone);
            println!("  ntp_server:          {}", config.ntp_server);
            println!("  diag_events_enabled: {}", config.diag_events_enabled);
            Ok(())
        }
        Some("set") => {
            let pairs = &args[1..];
            if pairs.is_empty() {
                eprintln!("⚠ config set requires at least one key=value pair");
                exit(2);
            }
            let mut fields = Map::new();
            for pair in pairs {
                let Some((key, raw)) = pair.split_once('=') else {
                    eprintln!("⚠ Expected key=value, got: {}", pair);
                    exit(2);
                };
                fields.insert(key.to_string(), parse_config_value(raw));
            }
            client.set_system_config(&Value::Object(fields))?;
            println!("✓ Config updated");
            Ok(())
        }
        Some(other) => {
            eprintln!("⚠ Unknown config action: {}", other);
            exit(2);
        }
    }
}

/// Coerce a command-line value into the JSON type the board expects.
fn parse_config_value(raw: &str) -> Value {
    if raw == "true" {
        return Value::Bool(true);
    }
    if raw == "false" {
        return Value::Bool(false);
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::from(f);
    }
    Value::String(raw.to_string())
}
