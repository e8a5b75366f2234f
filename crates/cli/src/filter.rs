use hostbound_api::ArtifactHandle;
use hostbound_core::config::HostConfig;
use tracing::info;

pub fn run(
    config: &HostConfig,
    resource: &str,
    origins: Vec<String>,
    as_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let exclusions = config.boundary.build_exclusions()?;
    if !exclusions.applies_to(resource) {
        info!("No provider exclusions configured for {}", resource);
    }

    let total = origins.len();
    let handles = origins
        .into_iter()
        .map(|origin| ArtifactHandle::new(resource, origin))
        .collect();
    let kept = exclusions.filter(resource, handles);

    if as_json {
        let kept: Vec<&str> = kept.iter().map(|h| h.origin.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&kept)?);
    } else {
        for handle in &kept {
            println!("{}", handle.origin);
        }
    }
    info!("{} of {} origins kept for {}", kept.len(), total, resource);
    Ok(())
}
