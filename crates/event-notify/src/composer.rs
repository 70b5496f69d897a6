//! Message composition
//!
//! One message is built per event and shared by all of its recipients. The
//! rendered body only depends on the event and the resolved image URLs.

use std::fmt::Write as _;
use std::sync::Arc;

use event_core::{Event, EventId, Recipient};
use tracing::instrument;

use crate::error::ComposeError;
use crate::storage::ObjectStore;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Reminder for one event, ready to hand to the mail transport
#[derive(Debug, Clone)]
pub struct Message {
    pub event_id: EventId,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    pub image_urls: Vec<String>,
    pub recipients: Vec<Recipient>,
}

/// Builds reminder messages, resolving image links through the object store
#[derive(Clone)]
pub struct MessageComposer {
    images: Arc<dyn ObjectStore>,
}

impl MessageComposer {
    pub fn new(images: Arc<dyn ObjectStore>) -> Self {
        Self { images }
    }

    /// One time-limited URL per image, in display order.
    /// Stops at the first image that cannot be resolved.
    pub async fn resolve_images(&self, event: &Event) -> Result<Vec<String>, ComposeError> {
        let mut urls = Vec::with_capacity(event.images.len());
        for filename in event.image_filenames() {
            let url = self
                .images
                .resolve_url(filename)
                .await
                .map_err(|source| ComposeError::Image {
                    filename: filename.to_string(),
                    source,
                })?;
            urls.push(url);
        }
        Ok(urls)
    }

    #[instrument(skip_all, fields(event_id = %event.id, recipients = recipients.len()))]
    pub async fn compose(
        &self,
        event: &Event,
        recipients: Vec<Recipient>,
    ) -> Result<Message, ComposeError> {
        let image_urls = self.resolve_images(event).await?;

        Ok(Message {
            event_id: event.id,
            subject: format!("Event reminder: {}", event.title),
            html_body: render_html(event, &image_urls),
            text_body: render_text(event, &image_urls),
            image_urls,
            recipients,
        })
    }
}

/// HTML body of the reminder. The image block is left out when there are no images.
pub fn render_html(event: &Event, image_urls: &[String]) -> String {
    let title = escape_html(&event.title);
    let mut html = String::with_capacity(1024);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"UTF-8\">\n");
    let _ = writeln!(html, "    <title>{title}</title>");
    html.push_str("</head>\n<body style=\"font-family: Arial, sans-serif; line-height: 1.6; color: #333;\">\n");
    html.push_str("    <div style=\"max-width: 600px; margin: 0 auto; padding: 20px;\">\n");
    let _ = writeln!(html, "        <h1>{title}</h1>");

    if !image_urls.is_empty() {
        html.push_str("        <div class=\"images\">\n");
        for url in image_urls {
            let _ = writeln!(
                html,
                "            <img src=\"{}\" alt=\"{title}\" style=\"max-width: 100%;\">",
                escape_html(url)
            );
        }
        html.push_str("        </div>\n");
    }

    let _ = writeln!(html, "        <p>{}</p>", escape_html(&event.description));
    let _ = writeln!(
        html,
        "        <p><strong>Date:</strong> {}</p>",
        event.starts_at.format(DATE_FORMAT)
    );
    let _ = writeln!(
        html,
        "        <p><strong>Place:</strong> {}</p>",
        escape_html(&event.place)
    );
    let _ = writeln!(
        html,
        "        <p><strong>Participants:</strong> {} / {}</p>",
        event.participants, event.max_participants
    );
    html.push_str("    </div>\n</body>\n</html>\n");

    html
}

/// Plain-text alternative listing the same facts and every image URL
pub fn render_text(event: &Event, image_urls: &[String]) -> String {
    let mut text = format!(
        "{}\n\n{}\n\nDate: {}\nPlace: {}\nParticipants: {} / {}\n",
        event.title,
        event.description,
        event.starts_at.format(DATE_FORMAT),
        event.place,
        event.participants,
        event.max_participants,
    );
    if !image_urls.is_empty() {
        text.push_str("\nImages:\n");
        for url in image_urls {
            let _ = writeln!(text, "{url}");
        }
    }
    text
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use event_core::{EventImage, UserId};

    fn event(images: &[&str]) -> Event {
        Event {
            id: EventId::new(4),
            owner_id: UserId::new(1),
            title: "Rust <Meetup>".to_string(),
            description: "Talks & pizza".to_string(),
            place: "Hall \"B\"".to_string(),
            participants: 12,
            max_participants: 40,
            starts_at: Utc.with_ymd_and_hms(2024, 5, 17, 18, 30, 0).unwrap(),
            active: true,
            images: images
                .iter()
                .enumerate()
                .map(|(i, name)| EventImage {
                    filename: (*name).to_string(),
                    position: i as i32,
                })
                .collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_contains_event_facts_escaped() {
        let html = render_html(&event(&[]), &[]);

        assert!(html.contains("<h1>Rust &lt;Meetup&gt;</h1>"));
        assert!(html.contains("Talks &amp; pizza"));
        assert!(html.contains("Hall &quot;B&quot;"));
        assert!(html.contains("2024-05-17 18:30"));
        assert!(html.contains("12 / 40"));
    }

    #[test]
    fn test_image_block_omitted_without_images() {
        let html = render_html(&event(&[]), &[]);
        assert!(!html.contains("<img"));
        assert!(!html.contains("class=\"images\""));
    }

    #[test]
    fn test_images_rendered_in_order() {
        let urls = vec![
            "http://h/api/v1/images/a.png?sig=x&y".to_string(),
            "http://h/api/v1/images/b.png?sig=z".to_string(),
        ];
        let html = render_html(&event(&["a.png", "b.png"]), &urls);

        let first = html.find("a.png?sig=x&amp;y").unwrap();
        let second = html.find("b.png?sig=z").unwrap();
        assert!(first < second);
        assert_eq!(html.matches("<img").count(), 2);
    }

    #[test]
    fn test_render_is_deterministic() {
        let urls = vec!["http://h/img".to_string()];
        let e = event(&["img"]);
        assert_eq!(render_html(&e, &urls), render_html(&e, &urls));
    }

    #[test]
    fn test_text_lists_urls() {
        let urls = vec!["http://h/1".to_string(), "http://h/2".to_string()];
        let text = render_text(&event(&["1", "2"]), &urls);

        assert!(text.starts_with("Rust <Meetup>\n"));
        assert!(text.contains("Images:\nhttp://h/1\nhttp://h/2\n"));
        assert!(!render_text(&event(&[]), &[]).contains("Images:"));
    }
}
