//! HTML bodies for the two notification emails.
//!
//! Every applicant-supplied value goes through `escape_html` before it is
//! interpolated.

use crate::models::application::ApplicationSubmission;

const ACCENT: &str = "#d4af37";

pub struct Email {
    pub subject: String,
    pub html: String,
}

/// Internal notification for the recruiting team: every submitted field plus
/// a link to the stored résumé.
pub fn recruiter_notification(
    submission: &ApplicationSubmission,
    cv_url: &str,
    company: &str,
) -> Email {
    let rows = [
        ("Nom", escape_html(&submission.last_name)),
        ("Prénom", escape_html(&submission.first_name)),
        (
            "Email",
            format!(
                r#"<a href="mailto:{email}" style="color: {ACCENT}; text-decoration: none;">{email}</a>"#,
                email = escape_html(&submission.email)
            ),
        ),
        ("Téléphone", escape_html(&submission.phone)),
        (
            "Poste",
            format!(
                r#"<strong style="color: {ACCENT};">{}</strong>"#,
                escape_html(submission.position.label())
            ),
        ),
        ("Localisation", escape_html(&submission.location())),
    ];

    let mut table = String::from(r#"<table style="width: 100%; border-collapse: collapse;">"#);
    for (label, value) in rows {
        table.push_str(&format!(
            r#"<tr><td style="padding: 12px; background: #f9f9f9; font-weight: bold; width: 150px;">{label}</td><td style="padding: 12px; background: white;">{value}</td></tr>"#
        ));
    }
    table.push_str("</table>");

    let message_block = if submission.cover_message.is_empty() {
        String::new()
    } else {
        format!(
            r#"<h3 style="color: {ACCENT}; margin-top: 30px;">Message / Motivation</h3><div style="background: #f9f9f9; padding: 20px; border-left: 4px solid {ACCENT}; line-height: 1.6;">{}</div>"#,
            multiline_html(&submission.cover_message)
        )
    };

    let body = format!(
        r#"<h2 style="color: {ACCENT}; border-bottom: 3px solid {ACCENT}; padding-bottom: 10px;">Informations du Candidat</h2>{table}{message_block}<div style="margin-top: 40px; text-align: center;"><a href="{url}" style="display: inline-block; padding: 18px 40px; background: {ACCENT}; color: #000; text-decoration: none; border-radius: 10px; font-weight: bold;">Télécharger le CV</a></div>"#,
        url = escape_html(cv_url)
    );

    Email {
        subject: format!(
            "Nouvelle candidature : {} - {}",
            submission.position.label(),
            submission.full_name()
        ),
        html: layout("Nouvelle Candidature Reçue", &body, company),
    }
}

/// Acknowledgement sent to the applicant's own address.
pub fn applicant_confirmation(submission: &ApplicationSubmission, company: &str) -> Email {
    let company_html = escape_html(company);
    let body = format!(
        r#"<p style="font-size: 18px; color: #333;">Bonjour <strong>{name}</strong>,</p><p style="font-size: 16px; color: #666; line-height: 1.8;">Nous avons bien reçu votre candidature pour le poste de <strong style="color: {ACCENT};">{position}</strong>.</p><div style="background: #f9f9f9; padding: 25px; border-left: 4px solid {ACCENT}; margin: 30px 0;"><p style="margin: 0; color: #666; line-height: 1.8;">Notre équipe va examiner votre profil avec attention. Si votre profil correspond à nos besoins, nous vous recontacterons dans les meilleurs délais.</p></div><p style="font-size: 16px; color: #666;">Nous vous remercions pour l'intérêt que vous portez à {company_html}.</p><p style="margin-top: 40px; color: #666;">Cordialement,</p><p style="color: {ACCENT}; font-weight: bold; font-size: 18px;">L'équipe {company_html}</p>"#,
        name = escape_html(&submission.full_name()),
        position = escape_html(submission.position.label()),
    );

    Email {
        subject: format!("Confirmation de réception de votre candidature - {company}"),
        html: layout(
            &format!("Merci {} !", escape_html(&submission.first_name)),
            &body,
            company,
        ),
    }
}

fn layout(heading: &str, body: &str, company: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; background: #f5f5f5;"><div style="background: linear-gradient(135deg, {ACCENT}, #f4e04d); padding: 40px; text-align: center;"><h1 style="color: #000; margin: 0;">{heading}</h1></div><div style="padding: 40px; background: white;">{body}</div><div style="padding: 30px; text-align: center; background: #1a1a1a; color: #999;"><p style="margin: 0; font-size: 14px;">© {company}</p></div></div>"#,
        company = escape_html(company)
    )
}

fn multiline_html(text: &str) -> String {
    escape_html(text)
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
    use crate::testing::submission;

    const COMPANY: &str = "Sunshine Beauty & Spa";

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_recruiter_subject_and_link() {
        let email = recruiter_notification(&submission(), "https://cdn.test/cv/1-a.pdf", COMPANY);
        assert_eq!(email.subject, "Nouvelle candidature : Coiffeur - Awa Diop");
        assert!(email.html.contains(r#"href="https://cdn.test/cv/1-a.pdf""#));
        assert!(email.html.contains("771234567"));
        assert!(email.html.contains("mailto:awa@example.com"));
        assert!(!email.html.contains("Message / Motivation"));
    }

    #[test]
    fn test_recruiter_includes_message_with_line_breaks() {
        let mut s = submission();
        s.cover_message = "Bonjour,\nJe suis <motivée>".to_string();
        s.district = "Plateau".to_string();
        let email = recruiter_notification(&s, "https://cdn.test/cv.pdf", COMPANY);
        assert!(email.html.contains("Message / Motivation"));
        assert!(email.html.contains("Bonjour,<br>Je suis &lt;motivée&gt;"));
        assert!(email.html.contains("Dakar, Plateau"));
    }

    #[test]
    fn test_applicant_confirmation_escapes_name() {
        let mut s = submission();
        s.first_name = "<script>".to_string();
        let email = applicant_confirmation(&s, COMPANY);
        assert_eq!(
            email.subject,
            "Confirmation de réception de votre candidature - Sunshine Beauty & Spa"
        );
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("Merci &lt;script&gt; !"));
        assert!(email.html.contains("Sunshine Beauty &amp; Spa"));
    }
}
