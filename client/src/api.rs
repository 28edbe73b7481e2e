use warden_shared::{MapConfig, MapError, MapSnapshot, ModerationCommand};

/// Fetch the current map snapshot for the configured server.
pub async fn fetch_snapshot(config: &MapConfig) -> Result<MapSnapshot, MapError> {
    let resp = gloo_net::http::Request::get(&config.snapshot_url())
        .send()
        .await
        .map_err(|e| MapError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(MapError::HttpStatus(resp.status()));
    }

    resp.json::<MapSnapshot>()
        .await
        .map_err(|e| MapError::Parse(e.to_string()))
}

/// Post a moderation command. The body is the tagged command JSON.
pub async fn send_command(config: &MapConfig, command: &ModerationCommand) -> Result<(), MapError> {
    let url = config.command_url(command.target_id(), command.action());
    let resp = gloo_net::http::Request::post(&url)
        .json(command)
        .map_err(|e| MapError::Parse(e.to_string()))?
        .send()
        .await
        .map_err(|e| MapError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(MapError::HttpStatus(resp.status()));
    }
    Ok(())
}
