use actix_web::{http::StatusCode, HttpResponse};

/// JSON responder; the payload is serialized as the whole response body.
pub struct Success<T: serde::Serialize> {
    pub status: StatusCode,
    pub body: Option<T>,
}

impl<T: serde::Serialize> Success<T> {
    pub fn ok(body: T) -> Self {
        Self { status: StatusCode::OK, body: Some(body) }
    }

    pub fn accepted(body: T) -> Self {
        Self { status: StatusCode::ACCEPTED, body: Some(body) }
    }
}

impl<T: serde::Serialize> actix_web::Responder for Success<T> {
    type Body = actix_web::body::BoxBody;

    fn respond_to(self, _req: &actix_web::HttpRequest) -> HttpResponse<Self::Body> {
        let mut response = HttpResponse::build(self.status);

        match self.body {
            Some(body) => response.json(body),
            None => response.finish(),
        }
    }
}
