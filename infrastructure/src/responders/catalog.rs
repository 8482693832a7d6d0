//! Canned answers for simulated responders
//!
//! A handful of well-known questions get a specific answer; anything else
//! gets a generic answer for its kind that quotes the question back.

use oracle_domain::QueryKind;

const TOKYO_POPULATION: &str = "Tokyo, Japan has roughly 14 million residents in the city \
proper and about 37.4 million across the Greater Tokyo Area, the most populous \
metropolitan area in the world.";

const QUANTUM_COMPUTING: &str = "Quantum computing processes information with qubits, which \
use superposition and entanglement to represent many states at once. For certain problems \
this allows dramatically faster computation than classical bits that are either 0 or 1.";

const WEATHER: &str = "Weather forecasts depend on real-time meteorological data and carry \
inherent uncertainty. Check a current meteorological service for reliable, \
location-specific conditions.";

const SQUARE_ROOT_144: &str = "The square root of 144 is 12, because 12 multiplied by 12 \
equals 144.";

/// The answer a well-behaved simulated responder gives to `query_text`
pub fn canned_answer(query_text: &str, kind: QueryKind) -> String {
    let lower = query_text.to_lowercase();

    if lower.contains("population") && lower.contains("tokyo") {
        return TOKYO_POPULATION.to_string();
    }
    if lower.contains("quantum computing") {
        return QUANTUM_COMPUTING.to_string();
    }
    if lower.contains("weather") || lower.contains("temperature") {
        return WEATHER.to_string();
    }
    if lower.contains("calculate") || lower.contains("square root") || lower.contains("144") {
        return SQUARE_ROOT_144.to_string();
    }

    match kind {
        QueryKind::Fact => format!(
            "Cross-checked factual answer to \"{}\", validated against several \
             independent sources.",
            query_text
        ),
        QueryKind::Opinion => format!(
            "The most widely supported view on \"{}\", weighed for consistency and \
             quality of reasoning. Opinions on this may differ.",
            query_text
        ),
        QueryKind::Calculation => format!(
            "Result for \"{}\", computed independently and cross-checked for \
             arithmetic errors.",
            query_text
        ),
        QueryKind::Prediction => format!(
            "Forecast for \"{}\" based on available data and predictive models. \
             Predictions are uncertain and should be weighed against other sources.",
            query_text
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_questions() {
        assert!(
            canned_answer("What is the current population of Tokyo?", QueryKind::Fact)
                .contains("14 million")
        );
        assert!(
            canned_answer("Explain quantum computing", QueryKind::Opinion).contains("qubits")
        );
        assert!(
            canned_answer("What's the temperature tomorrow?", QueryKind::Prediction)
                .contains("meteorological")
        );
        assert!(
            canned_answer("Calculate the square root of 144", QueryKind::Calculation)
                .contains("is 12")
        );
    }

    #[test]
    fn test_generic_answer_depends_on_kind() {
        let fact = canned_answer("Who wrote Hamlet?", QueryKind::Fact);
        let opinion = canned_answer("Who wrote Hamlet?", QueryKind::Opinion);
        assert_ne!(fact, opinion);
        assert!(fact.contains("\"Who wrote Hamlet?\""));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(
            canned_answer("TOKYO POPULATION", QueryKind::Fact),
            canned_answer("tokyo population", QueryKind::Fact)
        );
    }
}
