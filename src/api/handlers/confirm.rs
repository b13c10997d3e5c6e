//! Human-facing confirmation page.
//!
//! Unconfirmed bridge requests are redirected here; the page shows the
//! request details and the payload to re-send with `confirmed: true`. Every
//! interpolated value is validated first, so only registry names, hex
//! addresses, and strict decimals reach the markup.

use axum::{
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::chains;
use crate::core::validation::{validate_amount_strict, validate_evm_address};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmQuery {
    pub from_chain_id: Option<u64>,
    pub to_chain_id: Option<u64>,
    pub from_token_address: Option<String>,
    pub to_token_address: Option<String>,
    pub amount: Option<String>,
    pub to_address: Option<String>,
}

/// GET /bridge/confirm
pub async fn confirm_page(Query(query): Query<ConfirmQuery>) -> Response {
    match render(&query) {
        Ok(page) => Html(page).into_response(),
        Err(reason) => (
            StatusCode::BAD_REQUEST,
            Html(format!(
                "<!DOCTYPE html><html><body><h1>Invalid bridge request</h1><p>{}</p></body></html>",
                reason
            )),
        )
            .into_response(),
    }
}

fn render(query: &ConfirmQuery) -> Result<String, &'static str> {
    let from_chain = query
        .from_chain_id
        .and_then(chains::lookup)
        .ok_or("Unknown or missing source chain")?;
    let to_chain = query
        .to_chain_id
        .and_then(chains::lookup)
        .ok_or("Unknown or missing destination chain")?;

    let from_token = query.from_token_address.as_deref().ok_or("Missing fromTokenAddress")?;
    let to_token = query.to_token_address.as_deref().ok_or("Missing toTokenAddress")?;
    let amount = query.amount.as_deref().ok_or("Missing amount")?;

    validate_evm_address(from_token).map_err(|_| "Invalid fromTokenAddress")?;
    validate_evm_address(to_token).map_err(|_| "Invalid toTokenAddress")?;
    validate_amount_strict(amount, 18).map_err(|_| "Invalid amount")?;

    // empty toAddress means "caller's own wallet"
    let to_address = match query.to_address.as_deref() {
        None | Some("") => None,
        Some(addr) => {
            validate_evm_address(addr).map_err(|_| "Invalid toAddress")?;
            Some(addr)
        }
    };

    let recipient_row = match to_address {
        Some(addr) => format!("<tr><th>Recipient</th><td><code>{}</code></td></tr>", addr),
        None => "<tr><th>Recipient</th><td>Your connected wallet</td></tr>".to_string(),
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Confirm bridge</title></head>
<body>
<h1>Confirm bridge</h1>
<table>
<tr><th>From</th><td>{from_name} (chain {from_id})</td></tr>
<tr><th>To</th><td>{to_name} (chain {to_id})</td></tr>
<tr><th>Token</th><td><code>{from_token}</code> &rarr; <code>{to_token}</code></td></tr>
<tr><th>Amount</th><td>{amount}</td></tr>
{recipient_row}
</table>
<p>To proceed, re-send the bridge request with <code>"confirmed": true</code>:</p>
<pre>POST /api/mcp/bridge-asset
{{"fromChainId": {from_id}, "toChainId": {to_id}, "fromTokenAddress": "{from_token}",
 "toTokenAddress": "{to_token}", "amount": "{amount}", "confirmed": true}}</pre>
</body>
</html>"#,
        from_name = from_chain.name,
        from_id = from_chain.id,
        to_name = to_chain.name,
        to_id = to_chain.id,
        from_token = from_token,
        to_token = to_token,
        amount = amount,
        recipient_row = recipient_row,
    ))
}
