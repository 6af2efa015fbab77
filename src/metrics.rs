use std::time::SystemTime;

use crate::text_model::TextModel;

/// Live figures derived from the typing state; recomputed on every tick and
/// state change, never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    pub accuracy: f64,
    pub wpm: f64,
    pub percent_finished: f64,
}

/// Pure function of the text model, the timing anchor, and a wall-clock
/// sample.
///
/// Accuracy is defined as perfect (100) when nothing has been typed, and wpm
/// as 0 until the anchor is armed and time has passed. Words are the standard
/// five-characters convention.
pub fn compute(model: &TextModel, started_at: Option<SystemTime>, now: SystemTime) -> Metrics {
    let typed = model.typed_count() as f64;
    let correct = model.correct_count() as f64;

    let accuracy = if typed > 0.0 {
        correct / typed * 100.0
    } else {
        100.0
    };

    let elapsed_minutes = started_at
        .and_then(|s| now.duration_since(s).ok())
        .map(|d| d.as_secs_f64() / 60.0)
        .unwrap_or(0.0);
    let wpm = if elapsed_minutes > 0.0 {
        (typed / 5.0) / elapsed_minutes
    } else {
        0.0
    };

    let percent_finished = if model.is_empty() {
        100.0
    } else {
        correct / model.len() as f64 * 100.0
    };

    Metrics {
        accuracy,
        wpm,
        percent_finished,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_accuracy_is_perfect_before_typing() {
        let model = TextModel::new("cat dog");
        let m = compute(&model, None, SystemTime::now());

        assert_eq!(m.accuracy, 100.0);
        assert_eq!(m.percent_finished, 0.0);
    }

    #[test]
    fn test_wpm_zero_without_anchor() {
        let mut model = TextModel::new("cat");
        model.set_char(0, 'c');
        model.set_char(1, 'a');

        let m = compute(&model, None, SystemTime::now());

        assert_eq!(m.wpm, 0.0);
    }

    #[test]
    fn test_wpm_uses_five_char_words() {
        let mut model = TextModel::new("cat dog");
        for (i, c) in "cat dog".chars().enumerate() {
            model.set_char(i, c);
        }

        let start = SystemTime::now();
        let m = compute(&model, Some(start), start + Duration::from_secs(60));

        // 7 chars in one minute = 1.4 words per minute
        assert!((m.wpm - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_wpm_zero_when_clock_has_not_advanced() {
        let mut model = TextModel::new("cat");
        model.set_char(0, 'c');

        let start = SystemTime::now();
        let m = compute(&model, Some(start), start);

        assert_eq!(m.wpm, 0.0);
    }

    #[test]
    fn test_one_miss_in_seven() {
        let mut model = TextModel::new("cat dog");
        for (i, c) in "catXdog".chars().enumerate() {
            model.set_char(i, c);
        }

        let m = compute(&model, None, SystemTime::now());

        assert_eq!(model.typed_count(), 7);
        assert_eq!(model.correct_count(), 6);
        assert!((m.accuracy - 600.0 / 7.0).abs() < 1e-9);
        assert!((m.percent_finished - 600.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_reference_text_is_finished() {
        let model = TextModel::new("");
        let m = compute(&model, None, SystemTime::now());

        assert_eq!(m.percent_finished, 100.0);
    }
}
