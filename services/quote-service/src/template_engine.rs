//! Email Template Engine
//!
//! Handlebars rendering of the appointment notification sent to the groomer.
//! Rendering is pure: the same request and submission time always produce the
//! same subject and bodies.

use chrono::NaiveDateTime;
use grooming_models::{additional_service_label, main_service_label, AppointmentRequest, Scheduling};
use grooming_utils::{GroomingError, GroomingResult};
use handlebars::Handlebars;
use serde::Serialize;

pub const PRIORITY_MARKER: &str = "[PRIORITY] ";
pub const FIRST_AVAILABLE_NOTICE: &str = "First Available Appointment";
pub const NO_ADDITIONAL_SERVICES_NOTICE: &str = "No additional services requested";

const APPOINTMENT_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>New Grooming Appointment Request</title>
<style>
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;line-height:1.6;color:#333;max-width:600px;margin:0 auto;padding:20px;background-color:#f7f7f7;}
.container{background-color:#fff;border-radius:8px;padding:30px;box-shadow:0 2px 10px rgba(0,0,0,0.1);}
.header{text-align:center;border-bottom:2px solid #e5e5e5;padding-bottom:20px;margin-bottom:30px;}
.header h1{color:#2c3e50;margin:0;font-size:28px;}
.section{margin-bottom:25px;padding:15px;background-color:#f8f9fa;border-radius:6px;border-left:4px solid #007bff;}
.section h2{color:#2c3e50;margin:0 0 15px 0;font-size:18px;border-bottom:1px solid #dee2e6;padding-bottom:8px;}
.item{background-color:#fff;padding:10px;border-radius:4px;border:1px solid #e9ecef;margin-bottom:10px;}
.label{font-weight:bold;color:#495057;margin-bottom:4px;font-size:14px;}
.value{color:#212529;font-size:16px;}
.main-service{font-size:18px;font-weight:bold;color:#007bff;}
.services{list-style:none;padding:0;margin:0;}
.services li{background-color:#fff;padding:8px 12px;margin-bottom:5px;border-radius:4px;border-left:3px solid #28a745;}
.urgent{background-color:#fff3cd;border-left:4px solid #ffc107;padding:15px;border-radius:6px;margin-bottom:20px;}
.file{padding:8px;background-color:#e9ecef;margin-bottom:5px;border-radius:3px;font-family:monospace;}
.footer{text-align:center;margin-top:30px;padding-top:20px;border-top:1px solid #dee2e6;color:#6c757d;font-size:14px;}
a{color:#007bff;text-decoration:none;}
</style>
</head>
<body>
<div class="container">
<div class="header">
<h1>🐕 New Grooming Appointment Request</h1>
<p style="margin:10px 0 0 0;color:#6c757d;">Submitted on {{submitted_on}}</p>
</div>
{{#if first_available}}
<div class="urgent"><strong>⚡ Priority Request:</strong> Customer is flexible and wants the first available appointment!</div>
{{/if}}
<div class="section">
<h2>👤 Customer Information</h2>
<div class="item"><div class="label">Full Name</div><div class="value">{{customer_name}}</div></div>
<div class="item"><div class="label">Email Address</div><div class="value"><a href="mailto:{{email}}">{{email}}</a></div></div>
<div class="item"><div class="label">Primary Phone</div><div class="value"><a href="tel:{{phone_href}}">{{phone}}</a></div></div>
{{#if alt_phone}}
<div class="item"><div class="label">Alternate Phone</div><div class="value"><a href="tel:{{alt_phone_href}}">{{alt_phone}}</a></div></div>
{{/if}}
</div>
<div class="section">
<h2>🐾 Dog Information</h2>
<div class="item"><div class="label">Dog's Name</div><div class="value">{{dog_name}}</div></div>
<div class="item"><div class="label">Breed</div><div class="value">{{dog_breed}}</div></div>
<div class="item"><div class="label">Weight</div><div class="value">{{dog_weight}}</div></div>
<div class="item"><div class="label">Age</div><div class="value">{{dog_age}}</div></div>
</div>
<div class="section">
<h2>✂️ Requested Services</h2>
<div class="item"><div class="label">Main Service</div><div class="value main-service">{{main_service}}</div></div>
{{#if additional_services}}
<div class="label">Additional Services:</div>
<ul class="services">
{{#each additional_services}}<li>{{this}}</li>
{{/each}}</ul>
{{else}}
<p style="color:#6c757d;font-style:italic;">{{no_additional_services}}</p>
{{/if}}
</div>
<div class="section">
<h2>📅 Appointment Details</h2>
<div class="item"><div class="label">Preferred Date</div>
{{#if first_available}}
<div class="value" style="font-size:18px;color:#ffc107;font-weight:bold;">⚡ {{appointment_date}}</div>
{{else}}
<div class="value" style="font-size:18px;">{{appointment_date}}</div>
{{/if}}
</div>
</div>
{{#if comments}}
<div class="section">
<h2>💬 Additional Comments</h2>
<div class="item"><div class="value" style="white-space:pre-wrap;">{{comments}}</div></div>
</div>
{{/if}}
{{#if uploaded_files}}
<div class="section">
<h2>📎 Uploaded Documents</h2>
<div class="label">{{file_count}} file(s) attached to this email:</div>
{{#each uploaded_files}}<div class="file">{{this}}</div>
{{/each}}
</div>
{{/if}}
<div class="footer">
<p><strong>Next Steps:</strong> Review the request and contact the customer within 24 hours to confirm appointment details and provide a personalized quote.</p>
<p style="margin-top:15px;">This email was automatically generated from your dog grooming website appointment form.</p>
</div>
</div>
</body>
</html>
"#;

const APPOINTMENT_TEXT_TEMPLATE: &str = r#"New Grooming Appointment Request
Submitted on {{submitted_on}}
{{#if first_available}}
PRIORITY REQUEST: Customer wants the first available appointment!
{{/if}}

CUSTOMER
Name: {{customer_name}}
Email: {{email}}
Phone: {{phone}}
{{#if alt_phone}}Alternate phone: {{alt_phone}}
{{/if}}

DOG
Name: {{dog_name}}
Breed: {{dog_breed}}
Weight: {{dog_weight}}
Age: {{dog_age}}

SERVICES
Main service: {{main_service}}
{{#if additional_services}}{{#each additional_services}}- {{this}}
{{/each}}{{else}}{{no_additional_services}}
{{/if}}

PREFERRED DATE
{{appointment_date}}
{{#if comments}}

COMMENTS
{{comments}}
{{/if}}
{{#if uploaded_files}}

ATTACHED FILES ({{file_count}})
{{#each uploaded_files}}- {{this}}
{{/each}}{{/if}}
"#;

/// Values handed to both templates. Every field is already formatted for display.
#[derive(Debug, Serialize)]
struct EmailContext<'a> {
    submitted_on: String,
    first_available: bool,
    customer_name: String,
    email: &'a str,
    phone: &'a str,
    phone_href: String,
    alt_phone: Option<&'a str>,
    alt_phone_href: Option<String>,
    dog_name: &'a str,
    dog_breed: &'a str,
    dog_weight: String,
    dog_age: String,
    main_service: &'a str,
    additional_services: Vec<&'a str>,
    no_additional_services: &'static str,
    appointment_date: String,
    comments: Option<&'a str>,
    uploaded_files: &'a [String],
    file_count: usize,
}

impl<'a> EmailContext<'a> {
    fn new(request: &'a AppointmentRequest, submitted_at: NaiveDateTime) -> Self {
        let alt_phone = request.alt_phone();

        Self {
            submitted_on: submitted_at.format("%A, %B %-d, %Y at %I:%M %p").to_string(),
            first_available: request.is_first_available(),
            customer_name: request.customer_name(),
            email: request.email.trim(),
            phone: request.phone.trim(),
            phone_href: tel_href(&request.phone),
            alt_phone,
            alt_phone_href: alt_phone.map(tel_href),
            dog_name: request.dog_name.trim(),
            dog_breed: request.dog_breed.trim(),
            dog_weight: format!("{} lbs", request.dog_weight.trim()),
            dog_age: format_age(&request.dog_age),
            main_service: main_service_label(request.main_service.trim()),
            additional_services: request
                .additional_services
                .iter()
                .map(|code| additional_service_label(code))
                .collect(),
            no_additional_services: NO_ADDITIONAL_SERVICES_NOTICE,
            appointment_date: format_schedule(&request.scheduling),
            comments: request.comments(),
            uploaded_files: &request.uploaded_files,
            file_count: request.uploaded_files.len(),
        }
    }
}

/// Renders the subject line and bodies of the appointment email.
pub struct TemplateEngine {
    html: Handlebars<'static>,
    text: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut text = Handlebars::new();
        text.register_escape_fn(handlebars::no_escape);

        Self {
            html: Handlebars::new(),
            text,
        }
    }

    pub fn render_subject(&self, request: &AppointmentRequest) -> String {
        let urgency = if request.is_first_available() { PRIORITY_MARKER } else { "" };
        format!(
            "{}New Grooming Appointment: {} ({})",
            urgency,
            request.dog_name.trim(),
            request.customer_name()
        )
    }

    pub fn render_body(&self, request: &AppointmentRequest, submitted_at: NaiveDateTime) -> GroomingResult<String> {
        let context = EmailContext::new(request, submitted_at);
        self.html
            .render_template(APPOINTMENT_HTML_TEMPLATE, &context)
            .map_err(|e| GroomingError::internal(format!("Failed to render HTML body: {}", e)))
    }

    pub fn render_text(&self, request: &AppointmentRequest, submitted_at: NaiveDateTime) -> GroomingResult<String> {
        let context = EmailContext::new(request, submitted_at);
        self.text
            .render_template(APPOINTMENT_TEXT_TEMPLATE, &context)
            .map_err(|e| GroomingError::internal(format!("Failed to render text body: {}", e)))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn tel_href(phone: &str) -> String {
    phone.chars().filter(|c| *c == '+' || c.is_ascii_digit()).collect()
}

fn format_age(age: &str) -> String {
    match age.trim().parse::<i64>() {
        Err(_) => "Not specified".to_string(),
        Ok(1) => "1 year old".to_string(),
        Ok(years) if years < 1 => "Less than 1 year old".to_string(),
        Ok(years) => format!("{} years old", years),
    }
}

fn format_schedule(scheduling: &Scheduling) -> String {
    match scheduling {
        Scheduling::FirstAvailable => FIRST_AVAILABLE_NOTICE.to_string(),
        Scheduling::ExplicitDate(date) => date.format("%A, %B %-d, %Y").to_string(),
    }
}
