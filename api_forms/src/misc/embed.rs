/// Public submission endpoint of a form: `<base>/f/<endpoint_id>`.
pub fn form_url(base: &str, endpoint_id: &str) -> String {
    format!("{}/f/{}", base.trim_end_matches('/'), endpoint_id)
}

/// Sample HTML form posting to `form_url`. The hidden `_gotcha` input is
/// the honeypot the backend uses for spam filtering.
pub fn html_snippet(form_url: &str) -> String {
    format!(
        r#"<form action="{url}" method="POST">
  <input type="text" name="name" placeholder="Name" required />
  <input type="email" name="email" placeholder="Email" required />
  <textarea name="message" placeholder="Message" required></textarea>
  <!-- Honeypot field to prevent spam -->
  <input type="text" name="_gotcha" style="display:none" />
  <button type="submit">Send</button>
</form>"#,
        url = form_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_from_base() {
        assert_eq!(
            form_url("http://localhost:3002/", "abc123"),
            "http://localhost:3002/f/abc123"
        );
    }

    #[test]
    fn snippet_posts_to_form_and_has_honeypot() {
        let html = html_snippet("https://api.example.com/f/abc123");
        assert!(html.starts_with(r#"<form action="https://api.example.com/f/abc123" method="POST">"#));
        assert!(html.contains(r#"name="_gotcha""#));
        assert!(html.ends_with("</form>"));
    }
}
