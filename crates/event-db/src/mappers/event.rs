//! Event model -> entity mapper

use event_core::entities::{Event, EventImage};
use event_core::value_objects::{EventId, UserId};

use crate::models::{EventImageModel, EventModel};

/// Build an event from its row and the image rows that belong to it.
/// Images are sorted by position regardless of input order.
pub fn event_with_images(model: EventModel, images: Vec<EventImageModel>) -> Event {
    let mut images: Vec<EventImage> = images
        .into_iter()
        .filter(|image| image.event_id == model.id)
        .map(|image| EventImage {
            filename: image.filename,
            position: image.position,
        })
        .collect();
    images.sort_by_key(|image| image.position);

    Event {
        id: EventId::new(model.id),
        owner_id: UserId::new(model.owner_id),
        title: model.title,
        description: model.description,
        place: model.place,
        participants: model.participants,
        max_participants: model.max_participants,
        starts_at: model.starts_at,
        active: model.active,
        images,
        created_at: model.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_images_sorted_and_filtered() {
        let model = EventModel {
            id: 3,
            owner_id: 1,
            title: "t".to_string(),
            description: "d".to_string(),
            place: "p".to_string(),
            participants: 0,
            max_participants: 10,
            starts_at: Utc::now(),
            active: true,
            created_at: Utc::now(),
        };
        let images = vec![
            EventImageModel {
                event_id: 3,
                filename: "second.png".to_string(),
                position: 1,
            },
            EventImageModel {
                event_id: 4,
                filename: "other.png".to_string(),
                position: 0,
            },
            EventImageModel {
                event_id: 3,
                filename: "first.png".to_string(),
                position: 0,
            },
        ];

        let event = event_with_images(model, images);
        assert_eq!(event.id, EventId::new(3));
        assert_eq!(
            event.image_filenames().collect::<Vec<_>>(),
            vec!["first.png", "second.png"]
        );
    }
}
