use crate::layout::schema::LayoutDef;
use crate::model::{PersonCandidate, Rank};
use crate::parsing::lexer::{tokenize, Token};
use crate::trace::RejectionReason;

/// The people found in one cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellPeople {
    /// Rankless words before the first rank; they belong to the previous cell.
    pub leading: Option<String>,
    pub candidates: Vec<PersonCandidate>,
    pub rejected: Vec<(String, RejectionReason)>,
}

/// Split cell text into `(rank, name)` candidates.
///
/// Every rank opens a new candidate and the name words up to the next rank
/// are joined into it. Noise words and stray dates are skipped.
pub fn tokenize_people(text: &str, layout: &LayoutDef) -> CellPeople {
    let mut leading: Vec<String> = Vec::new();
    let mut open: Vec<(Rank, Vec<String>)> = Vec::new();

    for token in tokenize(text, layout) {
        match token {
            Token::Rank(rank) => open.push((rank, Vec::new())),
            Token::Name(word) => match open.last_mut() {
                Some((_, words)) => words.push(word),
                None => leading.push(word),
            },
            Token::Noise(_) | Token::Date(_) => {}
        }
    }

    let mut people = CellPeople {
        leading: (!leading.is_empty()).then(|| leading.join(" ")),
        ..CellPeople::default()
    };

    for (rank, words) in open {
        let name = words.join(" ");
        if let Err(reason) = validate_name(&name, layout) {
            people.rejected.push((format!("{} {}", rank, name).trim().to_string(), reason));
            continue;
        }
        let candidate = PersonCandidate {
            rank: Some(rank),
            name,
            from_continuation: false,
        };
        if !people.candidates.contains(&candidate) {
            people.candidates.push(candidate);
        }
    }

    people
}

/// Check a person name against the layout's name rules.
pub fn validate_name(name: &str, layout: &LayoutDef) -> Result<(), RejectionReason> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RejectionReason::EmptyName);
    }
    if layout.is_noise_name(name) {
        return Err(RejectionReason::NoiseToken);
    }

    let len = name.chars().count();
    if len < layout.names.min_length {
        return Err(RejectionReason::TooShort);
    }
    if len > layout.names.max_length {
        return Err(RejectionReason::TooLong);
    }
    if name.chars().any(|c| c.is_ascii_digit()) {
        return Err(RejectionReason::ContainsDigit);
    }
    if !name.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return Err(RejectionReason::InvalidCharacters);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::builtin::default_layout;

    fn names(people: &CellPeople) -> Vec<(Option<Rank>, &str)> {
        people
            .candidates
            .iter()
            .map(|c| (c.rank, c.name.as_str()))
            .collect()
    }

    #[test]
    fn test_two_people_in_one_cell() {
        let layout = default_layout().unwrap();
        let people = tokenize_people("CB SILVA CB PEREIRA", &layout);
        assert_eq!(
            names(&people),
            vec![(Some(Rank::Cb), "SILVA"), (Some(Rank::Cb), "PEREIRA")]
        );
        assert!(people.leading.is_none());
    }

    #[test]
    fn test_multiword_name_and_noise() {
        let layout = default_layout().unwrap();
        let people = tokenize_people("2ºSGT MARIA DAS DORES SUP", &layout);
        assert_eq!(names(&people), vec![(Some(Rank::Sgt2), "MARIA DAS DORES")]);
    }

    #[test]
    fn test_leading_segment() {
        let layout = default_layout().unwrap();
        let people = tokenize_people("CUNHA SD ALVES", &layout);
        assert_eq!(people.leading.as_deref(), Some("CUNHA"));
        assert_eq!(names(&people), vec![(Some(Rank::Sd), "ALVES")]);

        let only = tokenize_people("CUNHA", &layout);
        assert_eq!(only.leading.as_deref(), Some("CUNHA"));
        assert!(only.candidates.is_empty());
    }

    #[test]
    fn test_duplicate_in_cell_collapses() {
        let layout = default_layout().unwrap();
        let people = tokenize_people("CB LIMA CB LIMA", &layout);
        assert_eq!(people.candidates.len(), 1);
    }

    #[test]
    fn test_rejected_candidates() {
        let layout = default_layout().unwrap();
        let people = tokenize_people("CB CB DA SD X", &layout);
        assert!(people.candidates.is_empty());
        let reasons: Vec<RejectionReason> = people.rejected.iter().map(|(_, r)| *r).collect();
        assert_eq!(
            reasons,
            vec![
                RejectionReason::EmptyName,
                RejectionReason::NoiseToken,
                RejectionReason::TooShort
            ]
        );
    }

    #[test]
    fn test_empty_cell() {
        let layout = default_layout().unwrap();
        assert_eq!(tokenize_people("", &layout), CellPeople::default());
    }

    #[test]
    fn test_validate_name() {
        let layout = default_layout().unwrap();
        assert!(validate_name("JOÃO PAULO", &layout).is_ok());
        assert_eq!(validate_name("", &layout), Err(RejectionReason::EmptyName));
        assert_eq!(validate_name("R2D2", &layout), Err(RejectionReason::ContainsDigit));
        assert_eq!(
            validate_name("SILVA-LIMA", &layout),
            Err(RejectionReason::InvalidCharacters)
        );
        assert_eq!(
            validate_name(&"A".repeat(51), &layout),
            Err(RejectionReason::TooLong)
        );
        assert_eq!(validate_name("2ª CIA", &layout), Err(RejectionReason::NoiseToken));
    }
}
