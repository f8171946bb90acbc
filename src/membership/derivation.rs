use std::fmt::Display;

use itertools::Itertools;

use crate::grammar::symbol::EMPTY_MARKER;
use crate::grammar::Symbol;

// Any mix of terminals and nonterminals reachable from the start symbol
pub type SententialForm = Vec<Symbol>;

// One sentential form of a derivation. Nonterminals are shown between
// asterisks so they stand out from the terminals around them
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DerivationStep {
    pub form: SententialForm,
}

impl Display for DerivationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.form.is_empty() {
            return write!(f, "{}", EMPTY_MARKER);
        }
        for symbol in &self.form {
            match symbol {
                Symbol::Nonterminal(n) => write!(f, "*{}*", n)?,
                Symbol::Terminal(t) => write!(f, "{}", t)?,
            }
        }
        Ok(())
    }
}

// The forms visited from the start symbol to the derived string
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Derivation {
    steps: Vec<DerivationStep>,
}

impl Derivation {
    pub fn starting_at(start: Symbol) -> Self {
        Derivation { steps: vec![DerivationStep { form: vec![start] }] }
    }

    pub fn push(&mut self, form: SententialForm) {
        self.steps.push(DerivationStep { form });
    }

    pub fn pop(&mut self) -> Option<DerivationStep> {
        self.steps.pop()
    }

    pub fn steps(&self) -> &[DerivationStep] {
        &self.steps
    }

    pub fn rendered(&self) -> Vec<String> {
        self.steps.iter().map(DerivationStep::to_string).collect_vec()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromIterator<SententialForm> for Derivation {
    fn from_iter<I: IntoIterator<Item = SententialForm>>(forms: I) -> Self {
        Derivation {
            steps: forms.into_iter().map(|form| DerivationStep { form }).collect()
        }
    }
}

impl Display for Derivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.steps.iter().join(" → "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nt(text: &str) -> Symbol {
        Symbol::Nonterminal(text.to_string())
    }

    fn t(text: &str) -> Symbol {
        Symbol::Terminal(text.to_string())
    }

    #[test]
    fn render_steps() {
        let derivation: Derivation = vec![
            vec![nt("S")],
            vec![t("a"), nt("A")],
            vec![t("a"), t("b"), nt("A")],
            vec![t("a"), t("b")],
        ].into_iter().collect();

        assert_eq!(derivation.rendered(), vec!["*S*", "a*A*", "ab*A*", "ab"]);
        assert_eq!(derivation.to_string(), "*S* → a*A* → ab*A* → ab");
    }

    #[test]
    fn render_empty_form() {
        let mut derivation = Derivation::starting_at(nt("S"));
        derivation.push(vec![]);

        assert_eq!(derivation.to_string(), "*S* → ε");
        assert_eq!(derivation.pop(), Some(DerivationStep { form: vec![] }));
        assert_eq!(derivation.len(), 1);
    }
}
