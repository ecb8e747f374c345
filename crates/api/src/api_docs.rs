//! OpenAPI 3 document for the SlotBook API, served at `/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::dtos::*;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_handler,
        handlers::bookings::create_booking_handler,
        handlers::bookings::list_bookings_handler,
        handlers::bookings::get_booking_handler,
        handlers::bookings::update_booking_status_handler,
        handlers::bookings::delete_booking_handler,
        handlers::bookings::list_provider_bookings_handler,
        handlers::bookings::list_client_bookings_handler,
        handlers::providers::create_provider_handler,
        handlers::providers::list_providers_handler,
        handlers::providers::get_provider_handler,
        handlers::providers::update_provider_handler,
        handlers::providers::delete_provider_handler,
        handlers::providers::provider_availability_handler,
        handlers::users::create_user_handler,
        handlers::users::get_user_handler,
    ),
    components(schemas(
        ErrorBody,
        ErrorDetail,
        HealthDto,
        DeletedDto,
        CreateBookingDto,
        UpdateStatusDto,
        BookingDto,
        BookingViewDto,
        ProviderSummaryDto,
        ProviderInputDto,
        ProviderDto,
        AvailabilityDto,
        SlotAvailabilityDto,
        CreateUserDto,
        UserDto,
    )),
    tags(
        (name = "bookings", description = "Booking ledger"),
        (name = "providers", description = "Provider directory"),
        (name = "users", description = "User records"),
        (name = "health", description = "Liveness"),
    ),
    info(
        title = "SlotBook API",
        description = "Provider directory and booking ledger",
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_booking_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/bookings",
            "/bookings/{id}",
            "/bookings/provider/{provider_id}",
            "/bookings/client/{email}",
            "/providers/{id}/availability",
            "/users",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(doc.components.is_some_and(|c| c.schemas.contains_key("BookingDto")));
    }
}
