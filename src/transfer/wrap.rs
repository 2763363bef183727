//! Greedy word wrapping against an injected width measurement.

/// Width measurement capability used by the wrapper.
///
/// Implemented by the PDF font metrics in production and by simple fakes in
/// tests, so wrapping never depends on a rendering engine.
pub trait TextMeasure {
    /// Width of `text` when set at `size`, in the caller's units.
    fn width(&self, text: &str, size: f32) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, f32) -> f32,
{
    fn width(&self, text: &str, size: f32) -> f32 {
        self(text, size)
    }
}

/// Break `text` into lines no wider than `max_width`.
///
/// Words are never split; a word wider than `max_width` gets a line of its
/// own. Joining the result with single spaces gives back `text`.
pub fn wrap_text<M>(text: &str, measure: &M, size: f32, max_width: f32) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    if text.is_empty() {
        return Vec::new();
    }

    let mut words = text.split(' ');
    let mut lines = Vec::new();
    let mut current = words.next().unwrap_or_default().to_string();

    for word in words {
        let candidate = format!("{current} {word}");
        if measure.width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    lines.push(current);
    lines
}
