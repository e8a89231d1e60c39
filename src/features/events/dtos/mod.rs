mod event_dto;

pub use event_dto::{CreateEventDto, EventListQuery, EventResponseDto, UpdateEventDto};
