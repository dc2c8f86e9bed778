//! HTTP helpers shared by the service clients.

use daylog_core::SourceService;
use reqwest::{Response, StatusCode};

use crate::error::FetchError;

/// Gate a foundational response: an enumeration call whose failure makes
/// every dependent fan-out call meaningless.
///
/// # Errors
///
/// `Auth` for 401/403, `NotFound` for 404, `Service` for any other
/// non-2xx status.
pub(crate) fn foundational(
    response: Response,
    service: SourceService,
) -> Result<Response, FetchError> {
    match classify_status(response.status(), service) {
        None => Ok(response),
        Some(err) => Err(err),
    }
}

fn classify_status(status: StatusCode, service: SourceService) -> Option<FetchError> {
    if status.is_success() {
        return None;
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(FetchError::Auth { service }),
        StatusCode::NOT_FOUND => Some(FetchError::NotFound { service }),
        other => Some(FetchError::Service {
            service,
            status: other.as_u16(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses_pass() {
        assert!(classify_status(StatusCode::OK, SourceService::Github).is_none());
        assert!(classify_status(StatusCode::CREATED, SourceService::Devops).is_none());
    }

    #[test]
    fn auth_statuses_map_to_auth() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, SourceService::Github),
            Some(FetchError::Auth {
                service: SourceService::Github
            })
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, SourceService::Devops),
            Some(FetchError::Auth {
                service: SourceService::Devops
            })
        ));
    }

    #[test]
    fn missing_organization_maps_to_not_found() {
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, SourceService::Github),
            Some(FetchError::NotFound {
                service: SourceService::Github
            })
        ));
    }

    #[test]
    fn other_failures_keep_their_status() {
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, SourceService::Github),
            Some(FetchError::Service { status: 500, .. })
        ));
    }
}
