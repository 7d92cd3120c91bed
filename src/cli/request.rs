//! CLI handlers for raw endpoint calls and company selection.

use reqwest::Method;

use crate::client::{ApiClient, ApiRequest};

use super::CompanyCommands;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Handle `uruti get|post|put|patch|delete <path>`.
pub async fn handle_call(
    client: ApiClient,
    method: Method,
    path: &str,
    data: Option<&str>,
    raw: bool,
) -> CliResult {
    let mut request = ApiRequest::new(method, path);
    if let Some(data) = data {
        let body: serde_json::Value = serde_json::from_str(data)
            .map_err(|e| format!("--data is not valid JSON: {e}"))?;
        request = request.with_body(body);
    }

    let response = client.request(request).await?;
    let value = if raw {
        response.payload.into_value()
    } else {
        response.into_data()
    };
    match value {
        serde_json::Value::String(text) => println!("{text}"),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}

/// Handle `uruti company set|show`.
pub fn handle_company(client: ApiClient, command: CompanyCommands) -> CliResult {
    let session = client.session();
    match command {
        CompanyCommands::Set { company_id } => {
            session.set_company(company_id.trim())?;
            println!("✅ Active company: {}", company_id.trim());
        }
        CompanyCommands::Show => println!("{}", session.company_id()),
    }
    Ok(())
}
