use rocket::request::{self, FromRequest, Request};
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use uuid::Uuid;

use crate::error::GameError;

pub const PLAYER_ID_HEADER: &str = "X-Player-Id";

/// The player a request acts for, taken from the `X-Player-Id` header.
///
/// Resolution never fails the request; a missing or malformed header only surfaces as
/// `Unauthorized` when an endpoint asks for the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentPlayer(Option<Uuid>);

impl CurrentPlayer {
    pub fn id(&self) -> Result<Uuid, GameError> {
        self.0
            .ok_or_else(|| GameError::Unauthorized("Authentication required".to_string()))
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentPlayer {
    type Error = std::convert::Infallible;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let id = req
            .headers()
            .get_one(PLAYER_ID_HEADER)
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok());
        request::Outcome::Success(CurrentPlayer(id))
    }
}

impl<'r> OpenApiFromRequest<'r> for CurrentPlayer {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        Ok(RequestHeaderInput::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_id_is_unauthorized() {
        let anonymous = CurrentPlayer(None);
        assert!(matches!(anonymous.id(), Err(GameError::Unauthorized(_))));
        let id = Uuid::new_v4();
        assert_eq!(CurrentPlayer(Some(id)).id(), Ok(id));
    }
}
