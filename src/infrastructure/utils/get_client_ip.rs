use std::net::IpAddr;

use actix_web::HttpRequest;

use crate::entities::contact::Provenance;

const MAX_USER_AGENT_LEN: usize = 500;

/// Client address for provenance records. Forwarding headers are only
/// honoured when the service sits behind a trusted proxy, and only when the
/// left-most entry is an actual IP address; anything else falls back to the
/// peer address.
pub fn get_client_ip(req: &HttpRequest, trust_x_forwarded_for: bool) -> Option<String> {
    if trust_x_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|candidate| candidate.trim().parse::<IpAddr>().ok());

        match forwarded {
            Some(ip) => return Some(ip.to_string()),
            None if req.headers().contains_key("x-forwarded-for") => {
                tracing::debug!("Ignoring unparseable X-Forwarded-For header");
            }
            None => {}
        }
    }

    req.peer_addr().map(|addr| addr.ip().to_string())
}

pub fn get_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|ua| ua.chars().take(MAX_USER_AGENT_LEN).collect())
}

/// Provenance of a contact-form submission made through `req`.
pub fn contact_provenance(req: &HttpRequest, trust_x_forwarded_for: bool) -> Provenance {
    Provenance::contact_form(get_client_ip(req, trust_x_forwarded_for), get_user_agent(req))
}
