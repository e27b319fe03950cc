use super::{error_list, escape, Page};
use crate::auth::dto::{LoginForm, SignupForm};

pub fn signup(form: &SignupForm, errors: &[String]) -> Page {
    let body = format!(
        r#"<section class="auth-form">
    <h2>Join Movie Passport today.</h2>
    {errors}
    <form method="POST" action="/signup">
        <input name="username" placeholder="Username" value="{username}" required>
        <input name="email" type="email" placeholder="E-mail" value="{email}" required>
        <input name="password" type="password" placeholder="Password" minlength="6" required>
        <input name="first_name" placeholder="First name" value="{first_name}" required>
        <input name="last_name" placeholder="Last name" value="{last_name}" required>
        <input name="image_url" placeholder="(Optional) Image URL" value="{image_url}">
        <button type="submit">Sign me up!</button>
    </form>
    <p>Already have an account? <a href="/login">Log in</a></p>
</section>"#,
        errors = error_list(errors),
        username = escape(&form.username),
        email = escape(&form.email),
        first_name = escape(&form.first_name),
        last_name = escape(&form.last_name),
        image_url = escape(form.image_url.as_deref().unwrap_or_default()),
    );
    Page::new("Sign up", body)
}

pub fn login(form: &LoginForm, errors: &[String]) -> Page {
    let body = format!(
        r#"<section class="auth-form">
    <h2>Welcome back.</h2>
    {errors}
    <form method="POST" action="/login">
        <input name="username" placeholder="Username" value="{username}" required>
        <input name="password" type="password" placeholder="Password" required>
        <button type="submit">Log in</button>
    </form>
    <p>New here? <a href="/signup">Sign up</a></p>
</section>"#,
        errors = error_list(errors),
        username = escape(&form.username),
    );
    Page::new("Log in", body)
}
