//! Chat-completion backends. Only Groq's OpenAI-compatible endpoint is
//! implemented; anything speaking the same wire format can be pointed at via
//! `base_url`.

pub mod groq;
