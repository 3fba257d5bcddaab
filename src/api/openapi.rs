//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{availability, bookings, catalog, health, salons, schedules, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salon Booking API",
        version = "1.0.0",
        description = "Appointment scheduling REST API for hair and beauty salons"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Salons & staff
        salons::list_salons,
        salons::create_salon,
        salons::get_salon,
        salons::update_salon,
        salons::list_staff,
        salons::create_staff,
        salons::get_staff,
        salons::update_staff,
        // Services
        catalog::list_services,
        catalog::create_service,
        catalog::get_service,
        catalog::update_service,
        // Schedules
        schedules::get_salon_schedule,
        schedules::put_salon_schedule_day,
        schedules::get_staff_schedule,
        schedules::put_staff_schedule_day,
        schedules::list_salon_closures,
        schedules::create_salon_closure,
        schedules::list_staff_closures,
        schedules::create_staff_closure,
        schedules::delete_closure,
        // Availability
        availability::get_availability,
        availability::get_working_hours,
        // Bookings
        bookings::create_booking,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::update_booking_status,
        // Stats
        stats::get_booking_stats,
    ),
    components(
        schemas(
            // Salons & staff
            crate::models::salon::Salon,
            crate::models::salon::CreateSalon,
            crate::models::salon::UpdateSalon,
            crate::models::staff::Staff,
            crate::models::staff::CreateStaff,
            crate::models::staff::UpdateStaff,
            // Services
            crate::models::service::Service,
            crate::models::service::CreateService,
            crate::models::service::UpdateService,
            // Schedules
            crate::models::schedule::DaySchedule,
            crate::models::schedule::WorkingSlot,
            crate::models::schedule::UpsertDaySchedule,
            crate::models::schedule::TimeSlotInput,
            crate::models::schedule::ClosedDay,
            crate::models::schedule::CreateClosedDay,
            // Availability
            crate::models::availability::AvailabilityResponse,
            crate::models::availability::StaffAvailability,
            crate::models::availability::WorkingHoursResponse,
            crate::models::availability::OpenInterval,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::BookingStatus,
            crate::models::booking::CreateBooking,
            crate::models::booking::UpdateBookingStatus,
            crate::models::booking::BookingPage,
            bookings::BookingDetails,
            // Stats
            crate::models::booking::BookingStats,
            crate::models::booking::StatusCount,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "salons", description = "Salon management"),
        (name = "staff", description = "Staff management"),
        (name = "services", description = "Service catalog"),
        (name = "schedules", description = "Weekly schedules and closures"),
        (name = "availability", description = "Bookable time slots"),
        (name = "bookings", description = "Bookings"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_booking_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/salons/{id}/availability"));
        assert!(doc.paths.paths.contains_key("/bookings"));
        assert!(doc.paths.paths.contains_key("/staff/{id}/working-hours"));
    }
}
