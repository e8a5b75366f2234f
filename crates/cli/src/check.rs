use hostbound_core::config::HostConfig;
use serde_json::json;

pub fn run(
    config: &HostConfig,
    name: &str,
    as_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let policy = config.boundary.build_policy()?;
    let rule = policy.matching_rule(name);

    if as_json {
        let report = match rule {
            Some(rule) => json!({
                "name": name,
                "confined": true,
                "prefix": rule.prefix,
                "form": rule.form.to_string(),
            }),
            None => json!({ "name": name, "confined": false }),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match rule {
        Some(rule) => println!("confined: {} ({} form of {})", name, rule.form, rule.prefix),
        None => println!("delegated: {}", name),
    }
    Ok(())
}
