//! HTML body of the welcome email.

use html_escape::encode_text;

/// Subject line of the welcome email.
pub const WELCOME_SUBJECT: &str = "Welcome! Your free audiobook is ready";

/// Render the welcome email for `name` sent to `email`.
///
/// Both values are HTML-escaped before interpolation.
///
/// # Examples
/// ```
/// use landing_backend::outbound::mail::render_welcome;
///
/// let html = render_welcome("<Ann>", "ann@example.com");
/// assert!(html.contains("&lt;Ann&gt;"));
/// ```
pub fn render_welcome(name: &str, email: &str) -> String {
    let name = encode_text(name);
    let email = encode_text(email);
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Your free audiobook</title>
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: linear-gradient(135deg, #fbbf24, #f97316); color: white; padding: 30px; text-align: center; border-radius: 10px 10px 0 0; }}
    .content {{ background: #f9fafb; padding: 30px; border-radius: 0 0 10px 10px; }}
    .button {{ display: inline-block; background: #f97316; color: white; padding: 15px 30px; text-decoration: none; border-radius: 8px; font-weight: bold; margin: 20px 0; }}
    .footer {{ text-align: center; color: #666; font-size: 14px; margin-top: 30px; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Your free copy is waiting</h1>
      <p>Dear {name}, welcome aboard!</p>
    </div>
    <div class="content">
      <h2>Free audiobook edition</h2>
      <p>You now have access to eight hours of guided listening, free of charge.</p>
      <ul>
        <li>Narrated and explained by the author</li>
        <li>Listen on any device, online or offline</li>
        <li>Yours to keep, replay as often as you like</li>
      </ul>
      <a href="#" class="button">Start listening</a>
    </div>
    <div class="footer">
      <p>This message was sent to {email} because it was registered on our landing page.</p>
    </div>
  </div>
</body>
</html>
"##
    )
}
