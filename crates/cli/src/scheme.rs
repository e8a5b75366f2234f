use hostbound_api::AuthScheme;
use hostbound_core::config::{AuthConfig, HostConfig};
use serde_json::json;

pub fn run(
    config: &HostConfig,
    auth_type: Option<String>,
    as_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let auth = match auth_type {
        Some(auth_type) => AuthConfig {
            auth_type: Some(auth_type),
            ..config.auth.clone()
        },
        None => config.auth.clone(),
    };
    let scheme: AuthScheme = auth.scheme()?;

    if as_json {
        let report = json!({
            "auth_type": scheme.auth_type(),
            "scheme": scheme,
            "realm": auth.realm,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} (realm \"{}\")", scheme.auth_type(), auth.realm);
    }
    Ok(())
}

