//! Server-rendered HTML pages.
//!
//! Pages are plain strings; every user-supplied value passes through
//! [`escape`] before it is interpolated.

use axum::http::StatusCode;

use crate::db::{Appointment, Medication, Pet, User};
use crate::middleware::flash::Flash;
use crate::types::PetOverview;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn nav(user: Option<&User>) -> String {
    match user {
        Some(user) => format!(
            r#"<nav><a href="/">Home</a> <a href="/dashboard">Dashboard</a> <a href="/add_pet">Add pet</a> <a href="/contact_vet">Contact vet</a> <a href="/logout">Logout ({})</a></nav>"#,
            escape(&user.username)
        ),
        None => r#"<nav><a href="/">Home</a> <a href="/login">Login</a> <a href="/signup">Sign up</a></nav>"#
            .to_string(),
    }
}

fn flash_list(flashes: &[Flash]) -> String {
    if flashes.is_empty() {
        return String::new();
    }
    let items: String = flashes
        .iter()
        .map(|f| {
            format!(
                r#"<li class="flash flash-{}">{}</li>"#,
                f.category.as_str(),
                escape(&f.message)
            )
        })
        .collect();
    format!(r#"<ul class="flashes">{items}</ul>"#)
}

fn layout(title: &str, user: Option<&User>, flashes: &[Flash], body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{} - Pet Care</title></head>\n<body>\n{}\n{}\n<main>\n<h1>{}</h1>\n{}\n</main>\n</body>\n</html>\n",
        escape(title),
        nav(user),
        flash_list(flashes),
        escape(title),
        body
    )
}

fn list_or_empty(items: Vec<String>, empty: &str) -> String {
    if items.is_empty() {
        format!("<p>{empty}</p>")
    } else {
        format!("<ul>{}</ul>", items.concat())
    }
}

fn appointment_item(a: &Appointment) -> String {
    match a.description.as_deref() {
        Some(d) => format!("<li>{}: {}</li>", escape(&a.date), escape(d)),
        None => format!("<li>{}</li>", escape(&a.date)),
    }
}

fn medication_item(m: &Medication) -> String {
    format!(
        "<li>{} ({})</li>",
        escape(&m.medication_name),
        escape(&m.schedule)
    )
}

fn pet_links(pet: &Pet) -> String {
    format!(
        r#"<a href="/add_appointment/{id}">Appointments</a> <a href="/add_medication/{id}">Medications</a>"#,
        id = pet.id
    )
}

pub fn home(user: Option<&User>, flashes: &[Flash]) -> String {
    let body = match user {
        Some(_) => r#"<p>Keep track of your pets' appointments and medications.</p><p><a href="/dashboard">Go to your dashboard</a></p>"#,
        None => r#"<p>Keep track of your pets' appointments and medications.</p><p><a href="/signup">Create an account</a> or <a href="/login">log in</a>.</p>"#,
    };
    layout("Welcome", user, flashes, body)
}

pub fn signup(flashes: &[Flash]) -> String {
    let body = r#"<form method="post" action="/signup">
<label>Username <input type="text" name="username" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Sign up</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#;
    layout("Sign up", None, flashes, body)
}

pub fn login(flashes: &[Flash]) -> String {
    let body = r#"<form method="post" action="/login">
<label>Username <input type="text" name="username" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/signup">Sign up</a></p>"#;
    layout("Login", None, flashes, body)
}

pub fn dashboard(user: &User, flashes: &[Flash], pets: &[PetOverview]) -> String {
    let sections: Vec<String> = pets
        .iter()
        .map(|o| {
            format!(
                "<section class=\"pet\"><h2>{}</h2>{}<h3>Appointments</h3>{}<h3>Medications</h3>{}</section>",
                escape(&o.pet.name),
                pet_links(&o.pet),
                list_or_empty(
                    o.appointments.iter().map(appointment_item).collect(),
                    "No appointments."
                ),
                list_or_empty(
                    o.medications.iter().map(medication_item).collect(),
                    "No medications."
                ),
            )
        })
        .collect();
    let body = if sections.is_empty() {
        r#"<p>You have no pets yet. <a href="/add_pet">Add one</a>.</p>"#.to_string()
    } else {
        sections.concat()
    };
    layout("Dashboard", Some(user), flashes, &body)
}

pub fn add_pet(user: &User, flashes: &[Flash], pets: &[Pet]) -> String {
    let items = pets
        .iter()
        .map(|p| format!("<li>{} {}</li>", escape(&p.name), pet_links(p)))
        .collect();
    let body = format!(
        r#"<form method="post" action="/add_pet">
<label>Name <input type="text" name="name" required></label>
<button type="submit">Add pet</button>
</form>
<h2>Your pets</h2>
{}"#,
        list_or_empty(items, "No pets yet.")
    );
    layout("Add pet", Some(user), flashes, &body)
}

pub fn add_appointment(
    user: &User,
    flashes: &[Flash],
    pet_id: i64,
    appointments: &[Appointment],
) -> String {
    let body = format!(
        r#"<form method="post" action="/add_appointment/{pet_id}">
<label>Date <input type="text" name="date" required></label>
<label>Description <input type="text" name="description"></label>
<button type="submit">Add appointment</button>
</form>
<h2>Appointments</h2>
{}"#,
        list_or_empty(
            appointments.iter().map(appointment_item).collect(),
            "No appointments."
        )
    );
    layout("Add appointment", Some(user), flashes, &body)
}

pub fn add_medication(
    user: &User,
    flashes: &[Flash],
    pet_id: i64,
    medications: &[Medication],
) -> String {
    let body = format!(
        r#"<form method="post" action="/add_medication/{pet_id}">
<label>Medication <input type="text" name="medication_name" required></label>
<label>Schedule <input type="text" name="schedule" required></label>
<button type="submit">Add medication</button>
</form>
<h2>Medications</h2>
{}"#,
        list_or_empty(
            medications.iter().map(medication_item).collect(),
            "No medications."
        )
    );
    layout("Add medication", Some(user), flashes, &body)
}

pub fn contact_vet(user: &User, flashes: &[Flash]) -> String {
    let body = r#"<p>For emergencies call your nearest emergency veterinary clinic immediately.</p>
<p>For routine questions, contact your vet during opening hours and have your pet's appointment and medication history from the <a href="/dashboard">dashboard</a> at hand.</p>"#;
    layout("Contact a vet", Some(user), flashes, body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    layout(
        status.canonical_reason().unwrap_or("Error"),
        None,
        &[],
        &format!("<p>{}</p>", escape(message)),
    )
}
