//! End-to-end combat resolution through the public API and wire types.

use morphogen::{
    diminishing_multiplier, elemental_rps_multiplier, resolve_damage, resolve_damage_multiplier,
    Affinity, CombatOutcome, CombatQuery, DiminishingQuery, Element, MorphogenResult, Relation,
    ResistanceProfile, ResistanceSource, SourceOrigin,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_every_pair_has_a_defined_multiplier() {
    for attacker in Element::ALL {
        for defender in Element::ALL {
            let outcome = elemental_rps_multiplier(attacker.as_str(), defender.as_str());
            let expected = match outcome.relation {
                Relation::Advantage => 1.15,
                Relation::Disadvantage => 0.9,
                Relation::Mirror | Relation::Neutral => 1.0,
            };
            assert_eq!(outcome.multiplier, expected);
        }
    }
}

#[test]
fn test_buffed_defender_takes_less_damage() {
    let mut sources = vec![ResistanceSource::new(SourceOrigin::Base).resist("kinetic", 0.1)];
    let before = resolve_damage(
        Some(Element::Kinetic),
        Some(Element::Bio),
        Affinity::Neutral,
        None,
        &ResistanceProfile::assemble(&sources),
    );

    sources.push(ResistanceSource::new(SourceOrigin::Buff).resist("kinetic", 0.3));
    let after = resolve_damage(
        Some(Element::Kinetic),
        Some(Element::Bio),
        Affinity::Neutral,
        None,
        &ResistanceProfile::assemble(&sources),
    );

    assert!(after.final_multiplier < before.final_multiplier);
    assert!(approx(after.final_multiplier, 1.15 * 0.6));
}

#[test]
fn test_weakness_amplifies_damage() {
    let sources = [ResistanceSource::new(SourceOrigin::Trait).weak_to("thermal", 0.5)];
    let breakdown = resolve_damage(
        Some(Element::Thermal),
        Some(Element::Bio),
        Affinity::Attuned,
        Some(Element::Thermal),
        &ResistanceProfile::assemble(&sources),
    );

    // Same-element bonus wins over the advantage bonus
    assert_eq!(breakdown.affinity_bonus, 0.15);
    assert_eq!(breakdown.resistance, -0.5);
    assert!(approx(breakdown.final_multiplier, 1.3 * 1.5));
}

#[test]
fn test_final_multiplier_stays_bounded() {
    for attacker in Element::ALL {
        for resistance in [-10.0, -0.95, 0.0, 0.5, 0.95, 10.0] {
            for affinity in ["neutral", "attuned", "divergent"] {
                let query = CombatQuery::new(attacker.as_str(), "bio")
                    .with_affinity(affinity)
                    .with_resistance(attacker.as_str(), resistance);
                let outcome = resolve_damage_multiplier(&query);
                assert!(outcome.multiplier >= 0.05 * 0.05 - 1e-12);
                assert!(outcome.multiplier <= 5.0 * 5.0);
                assert!(outcome.multiplier.is_finite());
            }
        }
    }
}

#[test]
fn test_query_wire_round_trip() -> MorphogenResult<()> {
    let json = r#"{
        "attackingElement": " Psionic",
        "defendingElement": "RADIANT",
        "affinity": "attuned",
        "resistanceProfile": {"psionic": 0.25, "unknown": 3.0}
    }"#;
    let query: CombatQuery = serde_json::from_str(json)?;
    let outcome = resolve_damage_multiplier(&query);

    assert_eq!(outcome.relation, Relation::Advantage);
    assert!(approx(outcome.multiplier, 1.2 * 0.75));

    let encoded = serde_json::to_string(&outcome)?;
    let decoded: CombatOutcome = serde_json::from_str(&encoded)?;
    assert_eq!(decoded, outcome);
    Ok(())
}

#[test]
fn test_missing_query_fields_default_to_neutral() -> MorphogenResult<()> {
    let query: CombatQuery = serde_json::from_str(r#"{"attackingElement": "sonic"}"#)?;
    let outcome = resolve_damage_multiplier(&query);
    assert_eq!(outcome.relation, Relation::Neutral);
    assert_eq!(outcome.multiplier, 1.0);
    Ok(())
}

#[test]
fn test_diminishing_query_wire() -> MorphogenResult<()> {
    let query: DiminishingQuery = serde_json::from_str(
        r#"{"previousPurchases": 3, "tier": "large", "customMinimum": 0.6}"#,
    )?;
    assert_eq!(query.resolve(), 0.6);
    assert_eq!(diminishing_multiplier(2, "small", None, None), 0.36);
    Ok(())
}
