//! Challenge solver facade.
//!
//! Wires normalization, operand extraction, operator classification and
//! evaluation into one deterministic pipeline, optionally preceded by an
//! oracle attempt. Adversarial input never panics; it degrades to `None`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::{
    evaluate::{Answer, evaluate},
    normalize::{blob, clean, normalize},
    numbers::{NumberExtractor, NumberWord, Operand, Strategy},
    operator::{KeywordTable, Operator, OperatorClassifier},
    oracle::{Oracle, OracleError, solve_via_oracle},
};

/// Which paths the facade may use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Policy
{
    /// Ask the oracle first, fall back to the deterministic pipeline
    #[default]
    OracleFirst,
    /// Never contact the oracle
    DeterministicOnly,
}

/// Why a path produced no answer
#[derive(Debug, thiserror::Error)]
pub enum SolveError
{
    #[error("only {found} operand(s) recoverable")]
    InsufficientOperands
    {
        found: usize
    },

    #[error("oracle unavailable: {0}")]
    OracleUnavailable(#[from] OracleError),
}

/// Everything the deterministic path saw, for inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown
{
    pub normalized: String,
    pub blob: String,
    pub strategy: Strategy,
    pub operands: Vec<Operand>,
    pub operator: Operator,
    pub answer: Option<Answer>,
}

/// Solver over an immutable vocabulary and keyword table.
///
/// Holds no per-call state and is `Send + Sync`; share it freely.
pub struct Solver
{
    extractor: NumberExtractor,
    classifier: OperatorClassifier,
    oracle: Option<Box<dyn Oracle>>,
}

impl Solver
{
    pub fn new(
        vocabulary: &[NumberWord],
        keywords: &KeywordTable,
    ) -> Result<Self>
    {
        Ok(Self {
            extractor: NumberExtractor::new(vocabulary),
            classifier: OperatorClassifier::new(keywords)?,
            oracle: None,
        })
    }

    /// Attach an oracle for [`Policy::OracleFirst`]
    pub fn with_oracle(
        mut self,
        oracle: Box<dyn Oracle>,
    ) -> Self
    {
        self.oracle = Some(oracle);
        self
    }

    pub fn has_oracle(&self) -> bool
    {
        self.oracle
            .is_some()
    }

    /// Solve `challenge` under `policy`.
    ///
    /// With [`Policy::OracleFirst`] and an attached oracle, an oracle answer
    /// is returned as is; any oracle failure falls through to the
    /// deterministic pipeline.
    #[instrument(level = "debug", skip(self, challenge), fields(len = challenge.len()))]
    pub fn solve(
        &self,
        challenge: &str,
        policy: Policy,
    ) -> Option<Answer>
    {
        if let (Policy::OracleFirst, Some(oracle)) = (policy, self.oracle.as_deref())
        {
            match solve_via_oracle(oracle, challenge)
            {
                Ok(answer) =>
                {
                    info!(oracle = oracle.name(), %answer, "solved by oracle");
                    return Some(answer);
                }
                Err(e) => warn!(error = %SolveError::from(e), "falling back to deterministic solver"),
            }
        }

        match self.solve_deterministic(challenge)
        {
            Ok(answer) => Some(answer),
            Err(e) =>
            {
                warn!(error = %e, "challenge not solved");
                None
            }
        }
    }

    /// Deterministic pipeline only
    fn solve_deterministic(
        &self,
        challenge: &str,
    ) -> Result<Answer, SolveError>
    {
        let breakdown = self.explain(challenge);
        breakdown
            .answer
            .ok_or(SolveError::InsufficientOperands { found: breakdown.operands.len() })
    }

    /// Run the deterministic pipeline and report each intermediate result
    pub fn explain(
        &self,
        challenge: &str,
    ) -> Breakdown
    {
        let normalized = normalize(challenge);
        let blob = blob(challenge);

        let (operands, strategy) = self
            .extractor
            .extract_all(challenge, &normalized, &blob);

        let operator = self
            .classifier
            .classify(&clean(challenge), &blob);

        let answer = match operands.as_slice()
        {
            [a, b, ..] =>
            {
                let answer = evaluate(a.value, b.value, operator);
                debug!(a = a.value, b = b.value, op = %operator, %answer, %strategy, "evaluated");
                Some(answer)
            }
            _ => None,
        };

        Breakdown {
            normalized: normalized.to_string(),
            blob,
            strategy,
            operands: operands.to_vec(),
            operator,
            answer,
        }
    }
}

#[cfg(test)]
mod tests
{
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
    };

    use proptest::prelude::*;
    use regex::Regex;

    use super::*;
    use crate::core::numbers::{Strategy, default_number_words};

    fn solver() -> Solver
    {
        Solver::new(&default_number_words(), &KeywordTable::default()).expect("solver")
    }

    /// Oracle that always fails and counts calls
    struct Down(Arc<AtomicUsize>);

    impl Oracle for Down
    {
        fn complete(
            &self,
            _system: &str,
            _challenge: &str,
        ) -> Result<String, OracleError>
        {
            self.0
                .fetch_add(1, Ordering::SeqCst);
            Err(OracleError::Status(503))
        }

        fn name(&self) -> &'static str
        {
            "down"
        }
    }

    struct Fixed(&'static str);

    impl Oracle for Fixed
    {
        fn complete(
            &self,
            _system: &str,
            _challenge: &str,
        ) -> Result<String, OracleError>
        {
            Ok(self
                .0
                .to_string())
        }

        fn name(&self) -> &'static str
        {
            "fixed"
        }
    }

    #[test]
    fn clean_question_end_to_end()
    {
        let b = solver().explain("What is 12 plus 7?");
        assert_eq!(b.normalized, "what is 12 plus 7");
        assert_eq!(b.strategy, Strategy::Tokens);
        assert_eq!(
            b.operands
                .iter()
                .map(|o| o.value)
                .collect::<Vec<_>>(),
            vec![12.0, 7.0]
        );
        assert_eq!(b.operator, Operator::Add);
        assert_eq!(
            b.answer
                .as_ref()
                .map(Answer::as_str),
            Some("19.00")
        );
    }

    #[test]
    fn obfuscated_lobster_challenge()
    {
        let challenge = "A] LoOoObSstT-eR's ClAaW hAs tHiRrTy-tWwO nEeWtOnS, \
                         AnD iT gAiNs FiIvE mOrE... wHaT's ThE tOtAl?";
        let s = solver();
        let b = s.explain(challenge);
        assert_eq!(b.strategy, Strategy::Tokens);
        assert_eq!(b.operator, Operator::Add);

        let answer = s.solve(challenge, Policy::DeterministicOnly);
        assert_eq!(answer.unwrap().as_str(), "37.00");
    }

    #[test]
    fn blob_recovers_space_split_numbers()
    {
        let s = solver();
        let answer = s.solve("tHiRrT y mInUs fIiV e", Policy::DeterministicOnly);
        assert_eq!(answer.unwrap().as_str(), "25.00");
        assert_eq!(s.explain("tHiRrT y mInUs fIiV e").strategy, Strategy::Blob);
    }

    #[test]
    fn insufficient_operands_is_no_answer()
    {
        let s = solver();
        assert!(s.solve("what is the claw force?", Policy::DeterministicOnly).is_none());
        assert!(s.solve("only 7 here", Policy::DeterministicOnly).is_none());
        assert!(s.solve("", Policy::DeterministicOnly).is_none());
        assert!(matches!(
            s.solve_deterministic("only 7 here"),
            Err(SolveError::InsufficientOperands { found: 1 })
        ));
    }

    #[test]
    fn failing_oracle_falls_through()
    {
        let calls = Arc::new(AtomicUsize::new(0));
        let s = solver().with_oracle(Box::new(Down(calls.clone())));

        let answer = s.solve("What is 12 plus 7?", Policy::OracleFirst);
        assert_eq!(answer.unwrap().as_str(), "19.00");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn deterministic_only_skips_oracle()
    {
        let calls = Arc::new(AtomicUsize::new(0));
        let s = solver().with_oracle(Box::new(Down(calls.clone())));

        assert_eq!(s.solve("5 times 6", Policy::DeterministicOnly).unwrap().as_str(), "30.00");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn oracle_answer_wins_when_available()
    {
        let s = solver().with_oracle(Box::new(Fixed("Answer: 21")));
        assert_eq!(s.solve("What is 12 plus 7?", Policy::OracleFirst).unwrap().as_str(), "21.00");
    }

    #[test]
    fn unparsable_oracle_reply_falls_through()
    {
        let s = solver().with_oracle(Box::new(Fixed("I cannot help with that")));
        assert_eq!(s.solve("twenty minus four", Policy::OracleFirst).unwrap().as_str(), "16.00");
    }

    #[test]
    fn oracle_first_without_oracle_is_deterministic()
    {
        assert!(!solver().has_oracle());
        assert_eq!(
            solver()
                .solve("ten divided by four", Policy::OracleFirst)
                .unwrap()
                .as_str(),
            "2.50"
        );
    }

    #[test]
    fn concurrent_calls_share_one_solver()
    {
        let s = Arc::new(solver());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let s = Arc::clone(&s);
                thread::spawn(move || s.solve(&format!("{i} plus 1"), Policy::DeterministicOnly))
            })
            .collect();

        for (i, h) in handles
            .into_iter()
            .enumerate()
        {
            let expected = format!("{}.00", i + 1);
            assert_eq!(h.join().unwrap().unwrap().as_str(), expected);
        }
    }

    proptest! {
        #[test]
        fn arbitrary_text_never_panics(raw in "\\PC{0,128}")
        {
            let shape = Regex::new(r"^-?[0-9]+\.[0-9]{2}$").unwrap();
            let s = solver();

            if let Some(answer) = s.solve(&raw, Policy::DeterministicOnly)
            {
                prop_assert!(shape.is_match(answer.as_str()), "bad answer {:?}", answer.as_str());
            }
        }

        #[test]
        fn obfuscated_number_words_never_panic(
            raw in "[a-zA-Z0-9 .,?!~\\]\\[-]{0,96}"
        )
        {
            let s = solver();
            let b = s.explain(&raw);
            prop_assert_eq!(b.answer.is_some(), b.operands.len() >= 2);
            prop_assert_eq!(s.solve(&raw, Policy::DeterministicOnly), b.answer);
        }
    }
}
