//! Markup renderers. Each returns the markup plus the element handles tests and containers use.

pub mod bills;
pub mod layout;
pub mod new_bill;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn loading_page() -> String {
    r#"<div id="loading">Loading...</div>"#.to_string()
}

pub fn error_page(message: &str) -> String {
    format!(
        r#"<div class="error-page" data-testid="error-message"><div>Erreur</div><div>{}</div></div>"#,
        escape(message)
    )
}

pub fn login_ui() -> String {
    r#"<div class="login-page">
  <form data-testid="form-employee">
    <label for="employee-email-input">Votre email</label>
    <input type="email" data-testid="employee-email-input" placeholder="johndoe@email.com" required>
    <label for="employee-password-input">Mot de passe</label>
    <input type="password" data-testid="employee-password-input" placeholder="******" required>
    <button type="submit" data-testid="employee-login-button">Se connecter</button>
  </form>
</div>"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn error_page_shows_escaped_message() {
        assert!(error_page("Erreur <404>").contains("Erreur &lt;404&gt;"));
    }
}
