//! Fixed texts the bot sends and the prompts it builds.

/// Maximum characters of a director reply delivered to the chat.
pub const MAX_REPLY_CHARS: usize = 4000;

/// Appended to the user's idea before it goes to the image model.
pub const IMAGE_STYLE_SUFFIX: &str =
    ", cinematic, photorealistic, 8k, highly detailed, masterpiece, sharp focus";

/// Caption attached to generated images.
pub const IMAGE_CAPTION: &str = "📸 Created on Render (FLUX.1-dev)";

/// Transient status shown while the image is being generated.
pub const PAINTING_STATUS: &str = "🎨 Sedang melukis di server Cloud... (Tunggu sebentar)";

/// Sent when no image could be produced.
pub const IMAGE_BUSY: &str = "⚠️ Server gambar lagi penuh sesak. Coba sesaat lagi.";

/// Reply to the reset button.
pub const MEMORY_CLEARED: &str = "Ingatan dihapus! Mulai dari nol. 🤯";

/// Reply to the director button on its own.
pub const DIRECTOR_INTRO: &str =
    "Siap! 🎬\nSilakan ketik ide videomu. (Contoh: 'Kucing astronot di bulan')";

/// Reply after a casual chat failure wiped the session.
pub const CASUAL_APOLOGY: &str = "Maaf, aku lupa tadi ngomong apa. Ulangi dong.";

/// Text of the `GET /` health response.
pub const HEALTH_TEXT: &str = "Halo! Bot Alinka sedang berjalan di Render. (Status: Online 🟢)";

/// Welcome for `/start` and `/help`.
pub fn welcome(first_name: &str) -> String {
    format!(
        "Halo {}! 👋\nSaya Alinka (Versi Cloud Render).\nSiap membuat Naskah & Poster Video!",
        first_name
    )
}

/// Reply describing a director mode failure.
pub fn director_failure(error: &dyn std::fmt::Display) -> String {
    format!("Maaf, ada gangguan sistem: {}", error)
}

/// Instruction sent to the model for a director request.
pub fn director_prompt(user_text: &str) -> String {
    format!(
        "[ROLE: VIDEO DIRECTOR]\n\
        User Request: '{}'\n\
        Output Format:\n\
        1. 🇮🇩 KONSEP (Indo)\n\
        2. 🎬 PROMPT VISUAL (English - Detail, Cinematic, 8k)",
        user_text
    )
}

/// Prompt sent to the image model for a director request.
pub fn image_prompt(user_text: &str) -> String {
    format!("{}{}", user_text, IMAGE_STYLE_SUFFIX)
}

/// Hard-cut `text` to at most `max_chars` characters.
///
/// Counts `char`s, not bytes, so multi-byte text is never split inside a
/// code point. Returns `None` when the text already fits.
pub fn truncate_chars(text: &str, max_chars: usize) -> Option<&str> {
    text.char_indices()
        .nth(max_chars)
        .map(|(byte_idx, _)| &text[..byte_idx])
}
