use crate::config::EmailConfig;
use crate::models::{CurrentConditionsSnapshot, ForecastRecord, ForecastReport};
use crate::{ForecastError, Result};
use lettre::{
    Message, Transport,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::SmtpTransport,
    transport::smtp::authentication::Credentials,
};
use std::{env, fs, path::Path};

/// Delivery of the daily summary
pub trait Notifier {
    fn send(&self, report: &ForecastReport) -> Result<()>;
}

/// Sends through an authenticated SMTP relay
pub struct SmtpNotifier {
    config: EmailConfig,
    mailer: SmtpTransport,
}

impl SmtpNotifier {
    pub fn new(config: EmailConfig) -> Result<Self> {
        let mailer = create_mailer(&config)?;
        Ok(Self { config, mailer })
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, report: &ForecastReport) -> Result<()> {
        let email = build_message(&self.config, report)?;

        self.mailer
            .send(&email)
            .map_err(|e| ForecastError::notify(format!("Failed to send email: {e}")))?;

        tracing::info!(
            "Sent weather summary for {} to {} recipient(s)",
            report.location.display_name(),
            self.config.recipients.len()
        );
        Ok(())
    }
}

fn create_mailer(config: &EmailConfig) -> Result<SmtpTransport> {
    let password = env::var(&config.password_env).map_err(|_| {
        ForecastError::notify(format!("Missing {} env var", config.password_env))
    })?;

    let credentials = Credentials::new(config.sender.clone(), password);

    let mailer = SmtpTransport::relay(&config.relay)
        .map_err(|e| ForecastError::notify(format!("Invalid relay {}: {e}", config.relay)))?
        .credentials(credentials)
        .build();

    Ok(mailer)
}

/// Plain-text body: current conditions plus today's row
#[must_use]
pub fn compose_body(
    snapshot: &CurrentConditionsSnapshot,
    today: &ForecastRecord,
    signature: &str,
) -> String {
    let fields = [
        ("Location", snapshot.location_label.as_str()),
        ("Current Temp", snapshot.current_temperature.as_str()),
        ("Date", today.date.as_str()),
        ("High/Low Temperatures", today.high_low_temperature.as_str()),
        ("Weather Summary", today.summary.as_str()),
        ("Precipitation", today.precipitation.as_str()),
    ];

    let mut body = String::from("Top of the Morning to You,\n\n");
    for (key, value) in fields {
        body.push_str(&format!("{key}: {value}\n"));
    }
    body.push('\n');
    body.push_str(signature);
    body.push('\n');
    body
}

/// Assemble the email without sending it
pub fn build_message(config: &EmailConfig, report: &ForecastReport) -> Result<Message> {
    let today = report
        .table
        .today()
        .ok_or_else(|| ForecastError::notify("Forecast table is empty"))?;

    let from: Mailbox = format!("{} <{}>", config.sender_name, config.sender)
        .parse()
        .map_err(|e| ForecastError::notify(format!("Failed to parse from address: {e}")))?;

    let mut builder = Message::builder().from(from).subject(config.subject.clone());
    for recipient in &config.recipients {
        let to: Mailbox = recipient.parse().map_err(|e| {
            ForecastError::notify(format!("Failed to parse to address {recipient}: {e}"))
        })?;
        builder = builder.to(to);
    }

    let body = compose_body(&report.snapshot, today, &config.signature);
    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(body));

    if let Some(path) = config.attachment.as_deref() {
        match fs::read(path) {
            Ok(bytes) => parts = parts.singlepart(attachment(path, bytes)?),
            Err(e) => tracing::warn!("Skipping attachment {}: {}", path, e),
        }
    }

    builder
        .multipart(parts)
        .map_err(|e| ForecastError::notify(format!("Failed to build email: {e}")))
}

fn attachment(path: &str, bytes: Vec<u8>) -> Result<SinglePart> {
    let path = Path::new(path);
    let filename = path
        .file_name()
        .map_or_else(|| "attachment".to_string(), |n| n.to_string_lossy().into_owned());

    let mime = match path.extension().and_then(|e| e.to_str()) {
        Some("gif") => "image/gif",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    };
    let content_type = ContentType::parse(mime)
        .map_err(|e| ForecastError::notify(format!("Invalid content type {mime}: {e}")))?;

    Ok(Attachment::new(filename).body(bytes, content_type))
}
