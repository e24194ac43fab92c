use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

/// Ask a public lookup service which address we appear to come from.
pub async fn lookup_public_ip(client: &reqwest::Client, url: &str) -> eyre::Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    let body: IpResponse = response.json().await?;
    Ok(body.ip)
}
