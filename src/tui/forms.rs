//! Data-entry forms: new interviews, new hypotheses and funnel stage labels.

use crate::model::{
    InterviewPlan, InterviewStatus, NewHypothesis, Rating, RATING_MAX, RATING_MIN,
};
use crate::session::{FunnelEdit, SessionCommand};

const DEFAULT_KEY_QUESTION: &str =
    "What stops you from adopting a compliance-first AI platform today?";
const DEFAULT_HYPOTHESIS: &str = "If we offer built-in HIPAA/SOC2 compliance dashboards, AI health-coach startups will adopt CHS as their main infra.";
const DEFAULT_METRIC: &str = "Number of AI health-coach teams integrating CHS within 3 months";
const DEFAULT_EXPERIMENT: &str =
    "Run 5 design-partner calls with AI health-coach startups and offer them a pilot sandbox.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Interview,
    Hypothesis,
    FunnelLabel { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Rating(Rating),
    Choice {
        options: Vec<String>,
        selected: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub label: &'static str,
    pub value: FieldValue,
}

impl FormField {
    fn text(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: FieldValue::Text(value.to_string()),
        }
    }

    fn rating(label: &'static str, value: Rating) -> Self {
        Self {
            label,
            value: FieldValue::Rating(value),
        }
    }

    fn choice(label: &'static str, options: Vec<String>) -> Self {
        Self {
            label,
            value: FieldValue::Choice {
                options,
                selected: 0,
            },
        }
    }

    /// Current value as display text.
    pub fn display(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Rating(r) => r.to_string(),
            FieldValue::Choice { options, selected } => {
                options.get(*selected).cloned().unwrap_or_default()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focused: usize,
}

impl FormState {
    pub fn interview(segments: Vec<String>) -> Self {
        let statuses = InterviewStatus::ALL
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        Self {
            kind: FormKind::Interview,
            fields: vec![
                FormField::choice("Segment", segments),
                FormField::text("Persona", ""),
                FormField::text("Company Type", ""),
                FormField::rating("Priority (1–5)", 3),
                FormField::choice("Status", statuses),
                FormField::text("Key Question", DEFAULT_KEY_QUESTION),
            ],
            focused: 0,
        }
    }

    pub fn hypothesis(segments: Vec<String>) -> Self {
        Self {
            kind: FormKind::Hypothesis,
            fields: vec![
                FormField::choice("Segment", segments),
                FormField::rating("Impact (1–5)", 4),
                FormField::rating("Confidence (1–5)", 3),
                FormField::rating("Effort (1–5, higher = harder)", 3),
                FormField::text("Hypothesis", DEFAULT_HYPOTHESIS),
                FormField::text("Metric to Move", DEFAULT_METRIC),
                FormField::text("Next Experiment", DEFAULT_EXPERIMENT),
            ],
            focused: 0,
        }
    }

    /// Single text field prefilled with the stage's current label.
    pub fn funnel_label(index: usize, current: &str) -> Self {
        Self {
            kind: FormKind::FunnelLabel { index },
            fields: vec![FormField::text("Stage", current)],
            focused: 0,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Interview => "Add Interview Plan",
            FormKind::Hypothesis => "Add Hypothesis",
            FormKind::FunnelLabel { .. } => "Rename Funnel Stage",
        }
    }

    pub fn next_field(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }

    /// Typed character: appended to text fields, digits set ratings.
    pub fn input_char(&mut self, c: char) {
        match &mut self.fields[self.focused].value {
            FieldValue::Text(s) => s.push(c),
            FieldValue::Rating(r) => {
                if let Some(d) = c.to_digit(10) {
                    let d = d as Rating;
                    if (RATING_MIN..=RATING_MAX).contains(&d) {
                        *r = d;
                    }
                }
            }
            FieldValue::Choice { .. } => {}
        }
    }

    pub fn backspace(&mut self) {
        if let FieldValue::Text(s) = &mut self.fields[self.focused].value {
            s.pop();
        }
    }

    /// Step a rating within 1–5 or cycle a choice.
    pub fn adjust(&mut self, delta: i8) {
        match &mut self.fields[self.focused].value {
            FieldValue::Rating(r) => {
                *r = (*r as i16 + delta as i16).clamp(RATING_MIN as i16, RATING_MAX as i16) as Rating;
            }
            FieldValue::Choice { options, selected } if !options.is_empty() => {
                let n = options.len() as isize;
                *selected = ((*selected as isize + delta as isize).rem_euclid(n)) as usize;
            }
            _ => {}
        }
    }

    fn text_at(&self, i: usize) -> String {
        match &self.fields[i].value {
            FieldValue::Text(s) => s.trim().to_string(),
            _ => self.fields[i].display(),
        }
    }

    fn rating_at(&self, i: usize) -> Rating {
        match self.fields[i].value {
            FieldValue::Rating(r) => r,
            _ => 0,
        }
    }

    /// Build the session command this form submits.
    pub fn to_command(&self) -> SessionCommand {
        match self.kind {
            FormKind::Interview => {
                let status = InterviewStatus::ALL
                    .iter()
                    .copied()
                    .find(|s| s.as_str() == self.fields[4].display())
                    .unwrap_or(InterviewStatus::Planned);
                SessionCommand::AddInterview(InterviewPlan {
                    segment: self.fields[0].display(),
                    persona: self.text_at(1),
                    company_type: self.text_at(2),
                    priority: self.rating_at(3),
                    key_question: self.text_at(5),
                    status,
                })
            }
            FormKind::Hypothesis => SessionCommand::AddHypothesis(NewHypothesis {
                segment: self.fields[0].display(),
                impact: self.rating_at(1),
                confidence: self.rating_at(2),
                effort: self.rating_at(3),
                hypothesis: self.text_at(4),
                metric_to_move: self.text_at(5),
                next_experiment: self.text_at(6),
            }),
            FormKind::FunnelLabel { index } => SessionCommand::EditFunnelStage {
                index,
                edit: FunnelEdit::Label(self.text_at(0)),
            },
        }
    }
}
