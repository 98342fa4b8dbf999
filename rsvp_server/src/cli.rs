use std::env;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variables that are safe to echo back to the operator. The FCM access token is left out. The service
/// account entries are file paths, not the key itself.
const PUBLIC_ENVS: [(&str, &[&str]); 3] = [
    (
        "Server",
        &["RUST_LOG", "RSVP_HOST", "RSVP_PORT", "RSVP_DATABASE_URL", "RSVP_EVENT_BUFFER_SIZE", "RSVP_RUN_MIGRATIONS"],
    ),
    (
        "Watchers",
        &["RSVP_LEAD_WINDOW_MINUTES", "RSVP_PROXIMITY_THRESHOLD_KM", "RSVP_REFERENCE_ZONE", "RSVP_ORDER_TIME_OFFSET_HOURS"],
    ),
    (
        "Push delivery",
        &[
            "RSVP_FCM_PROJECT_ID",
            "RSVP_FCM_SERVICE_ACCOUNT",
            "GOOGLE_APPLICATION_CREDENTIALS",
            "RSVP_FCM_API_URL",
            "RSVP_FCM_VALIDATE_ONLY",
        ],
    ),
];

/// The server has no options. `--version` prints the version; any other argument prints the help text along with the
/// current configuration. Returns true if the server should exit instead of starting.
pub fn handle_command_line_args() -> bool {
    let Some(arg) = env::args().nth(1) else {
        return false;
    };
    if matches!(arg.as_str(), "-V" | "--version") {
        println!("rsvp_server {VERSION}");
    } else {
        println!("\n{}\n", include_str!("./cli-help.txt"));
        println!("Current environment values (EXCLUDING variables that contain secrets):");
        for (section, names) in PUBLIC_ENVS {
            println!("\n  {section}");
            for name in names {
                println!("    {name:<33} {}", describe_env(name));
            }
        }
    }
    true
}

fn describe_env(name: &str) -> String {
    match env::var_os(name) {
        None => "Not set".into(),
        Some(val) => match val.into_string() {
            Ok(s) => s,
            Err(raw) => format!("Invalid value: {}", raw.to_string_lossy()),
        },
    }
}
