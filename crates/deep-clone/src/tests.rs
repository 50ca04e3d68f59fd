//! Scenario tests for the deep clone engine
//!
//! Each test builds a small record graph in a `MemoryStore` and checks the
//! copies, the relinked relationship slots and, where it matters, the
//! foreign keys a persistence layer would write for the copied graph.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Value};

use crate::cloner::DeepCloner;
use crate::dictionary::CloneDictionary;
use crate::error::CloneError;
use crate::memory::{MemoryStore, RecordId};
use crate::options::{AttributeFilter, CloneOptions, Condition, IncludeSpec};
use crate::store::{AttributeStore, Related, RelationshipStore};


use fixtures::{crew, id, part_tree, person_with_car, save_graph, site, store, student_with_subjects};

type Spec = IncludeSpec<MemoryStore>;
type Cond = Condition<MemoryStore>;
type Options = CloneOptions<MemoryStore>;

fn named(name: &'static str) -> impl Fn(&MemoryStore, RecordId) -> bool {
    move |store, record| store.get(record, "name") == Some(json!(name))
}

fn name_of(store: &MemoryStore, record: RecordId) -> Value {
    store.get(record, "name").unwrap_or(Value::Null)
}

#[test]
fn test_plain_clone_is_new_and_keeps_attributes() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let copy = DeepCloner::new(&*schema)
        .clone(&mut store, crew.jack, &Options::new())
        .unwrap();

    assert!(store.is_new_record(copy));
    assert!(!store.is_new_record(crew.jack));
    for attribute in ["name", "nick_name", "age", "ship_type"] {
        assert_eq!(store.get(copy, attribute), store.get(crew.jack, attribute));
    }
    assert!(store.related_many(copy, "mateys").is_empty());
}

#[test]
fn test_single_exception_resets_to_null_default() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let copy = DeepCloner::new(&*schema)
        .clone(&mut store, crew.jack, &Options::new().except("name"))
        .unwrap();

    assert_eq!(store.get(copy, "name"), Some(Value::Null));
    assert_eq!(store.get(copy, "nick_name"), Some(json!("Captain Jack")));
}

#[test]
fn test_exception_resets_to_column_default() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let copy = DeepCloner::new(&*schema)
        .clone(&mut store, crew.jack, &Options::new().except(["nick_name", "age"]))
        .unwrap();

    assert_eq!(store.get(copy, "nick_name"), Some(json!("no nickname")));
    assert_eq!(store.get(copy, "age"), Some(Value::Null));
    assert_eq!(name_of(&store, copy), json!("Jack Sparrow"));
}

#[test]
fn test_only_resets_everything_else() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let copy = DeepCloner::new(&*schema)
        .clone(&mut store, crew.jack, &Options::new().only("name"))
        .unwrap();

    assert_eq!(name_of(&store, copy), json!("Jack Sparrow"));
    assert_eq!(store.get(copy, "nick_name"), Some(json!("no nickname")));
    assert_eq!(store.get(copy, "age"), Some(Value::Null));
    assert!(store.is_new_record(copy));
}

#[test]
fn test_nested_exception_only_touches_the_child() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let options = Options::new()
        .include("parrot")
        .except(AttributeFilter::new().nested("parrot", "name"));
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &options).unwrap();

    assert_eq!(name_of(&store, copy), json!("Jack Sparrow"));
    let parrot = store.related_one(copy, "parrot").unwrap();
    assert_ne!(parrot, crew.polly);
    assert_eq!(name_of(&store, parrot), Value::Null);
    assert_eq!(name_of(&store, crew.polly), json!("Polly"));
}

#[test]
fn test_nested_only_narrows_the_child() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let options = Options::new()
        .include(Spec::map(vec![("treasures", "gold_pieces")]))
        .only(AttributeFilter::new().attribute("name").nested("treasures", ["found_at"]));
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &options).unwrap();

    assert_eq!(store.get(copy, "nick_name"), Some(json!("no nickname")));
    let treasure = store.related_one(copy, "treasures").unwrap();
    assert_eq!(store.get(treasure, "found_at"), Some(json!("Isla del Muerte")));
    // not filtered further down
    let gold = store.related_one(treasure, "gold_pieces").unwrap();
    assert_ne!(gold, crew.gold_piece);
}

#[test]
fn test_include_to_one() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let copy = DeepCloner::new(&*schema)
        .clone(&mut store, crew.jack, &Options::new().include("parrot"))
        .unwrap();

    let parrot = store.related_one(copy, "parrot").unwrap();
    assert_ne!(parrot, crew.polly);
    assert!(store.is_new_record(parrot));
    assert_eq!(name_of(&store, parrot), json!("Polly"));
    assert_eq!(store.related_one(crew.jack, "parrot"), Some(crew.polly));
}

#[test]
fn test_include_missing_to_one_yields_empty_slot() {
    let (schema, mut store) = store();
    let lonely = store.create("Pirate", json!({ "name": "Lonely" })).unwrap();

    let copy = DeepCloner::new(&*schema)
        .clone(&mut store, lonely, &Options::new().include("parrot"))
        .unwrap();

    assert_eq!(store.get_related(copy, "parrot"), Related::One(None));
}

#[test]
fn test_conditional_to_one_copies_only_accepted_records() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);
    let parrots = store.records_of("Parrot").len();

    let accepted = Options::new().include(Spec::conditional("parrot", Cond::when(named("Polly"))));
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &accepted).unwrap();
    let parrot = store.related_one(copy, "parrot").unwrap();
    assert_ne!(parrot, crew.polly);
    assert_eq!(name_of(&store, parrot), json!("Polly"));
    assert_eq!(store.records_of("Parrot").len(), parrots + 1);

    let rejected = Options::new().include(Spec::conditional("parrot", Cond::unless(named("Polly"))));
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &rejected).unwrap();
    assert_eq!(store.get_related(copy, "parrot"), Related::One(None));
    assert_eq!(store.records_of("Parrot").len(), parrots + 1);
}

#[test]
fn test_rejected_belongs_to_yields_empty_slot() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);
    let pirates = store.records_of("Pirate").len();

    let options = Options::new().include(Spec::conditional("pirate", Cond::when(named("Barbossa"))));
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.polly, &options).unwrap();

    assert_eq!(store.get_related(copy, "pirate"), Related::One(None));
    assert_eq!(store.records_of("Pirate").len(), pirates);
}

#[test]
fn test_has_many_is_relinked_to_the_copy() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let copy = DeepCloner::new(&*schema)
        .clone(&mut store, crew.jack, &Options::new().include("mateys"))
        .unwrap();

    let mateys = store.related_many(copy, "mateys");
    assert_eq!(mateys.len(), 1);
    assert_ne!(mateys[0], crew.john);
    assert_eq!(store.get(mateys[0], "pirate_id"), Some(Value::Null));
    assert_eq!(store.related_one(mateys[0], "pirate"), Some(copy));

    save_graph(&schema, &mut store, copy);
    assert_eq!(store.get(mateys[0], "pirate_id"), Some(id(&store, copy)));
    assert_eq!(store.get(crew.john, "pirate_id"), Some(id(&store, crew.jack)));
}

#[test]
fn test_nested_include() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);
    let gold_before = store.records_of("GoldPiece").len();

    let options = Options::new().include(Spec::list(vec![
        Spec::from("mateys"),
        Spec::map(vec![("treasures", "gold_pieces")]),
    ]));
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &options).unwrap();

    let treasures = store.related_many(copy, "treasures");
    assert_eq!(treasures.len(), 1);
    assert_ne!(treasures[0], crew.treasure);
    assert_eq!(store.related_many(treasures[0], "gold_pieces").len(), 1);
    assert_eq!(store.records_of("GoldPiece").len(), gold_before + 1);

    save_graph(&schema, &mut store, copy);
    let gold = store.related_one(treasures[0], "gold_pieces").unwrap();
    assert_eq!(store.get(treasures[0], "owner"), Some(id(&store, copy)));
    assert_eq!(store.get(gold, "treasure_id"), Some(id(&store, treasures[0])));
}

#[test]
fn test_dictionary_copies_shared_record_once() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);
    let mateys_before = store.records_of("Matey").len();

    let options = Options::new()
        .include(Spec::list(vec![
            Spec::from("mateys"),
            Spec::map(vec![("treasures", "matey")]),
        ]))
        .use_dictionary(true);
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &options).unwrap();

    let matey = store.related_one(copy, "mateys").unwrap();
    let treasure = store.related_one(copy, "treasures").unwrap();
    assert_eq!(store.related_one(treasure, "matey"), Some(matey));
    assert_eq!(store.records_of("Matey").len(), mateys_before + 1);
}

#[test]
fn test_without_dictionary_shared_record_is_copied_per_path() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);
    let mateys_before = store.records_of("Matey").len();

    let options = Options::new().include(Spec::list(vec![
        Spec::from("mateys"),
        Spec::map(vec![("treasures", "matey")]),
    ]));
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &options).unwrap();

    let matey = store.related_one(copy, "mateys").unwrap();
    let treasure = store.related_one(copy, "treasures").unwrap();
    let other = store.related_one(treasure, "matey").unwrap();
    assert_ne!(matey, other);
    assert_eq!(store.records_of("Matey").len(), mateys_before + 2);
}

#[test]
fn test_dictionary_stops_cycles() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let options = Options::new()
        .include(Spec::map(vec![("mateys", Spec::list(vec![Spec::from("pirate")]))]))
        .use_dictionary(true);
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &options).unwrap();

    let matey = store.related_one(copy, "mateys").unwrap();
    assert_eq!(store.related_one(matey, "pirate"), Some(copy));
    assert_eq!(store.records_of("Pirate").len(), 2);
}

#[test]
fn test_caller_seeded_dictionary_is_reused() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let seeded = store.duplicate(crew.john);
    store.set(seeded, "name", json!("John (seeded)"));
    let mut dictionary = CloneDictionary::new();
    dictionary.seed(&store, crew.john, seeded);

    let options = Options::new().include("mateys");
    let copy = DeepCloner::new(&*schema)
        .clone_with_dictionary(&mut store, crew.jack, &options, &mut dictionary)
        .unwrap();

    assert_eq!(store.related_many(copy, "mateys"), vec![seeded]);
    assert_eq!(name_of(&store, seeded), json!("John (seeded)"));
    assert_eq!(dictionary.lookup(&store, crew.jack), Some(copy));
    assert_eq!(dictionary.len(), 2);
}

#[test]
fn test_many_to_many_links_instead_of_copying() {
    let (schema, mut store) = store();
    let (person, car) = person_with_car(&mut store);
    let cars_before = store.records_of("Car").len();

    let copy = DeepCloner::new(&*schema)
        .clone(&mut store, person, &Options::new().include("cars"))
        .unwrap();

    assert_eq!(store.records_of("Car").len(), cars_before);
    assert_eq!(store.related_many(copy, "cars"), vec![car]);
    assert_eq!(store.related_many(car, "people"), vec![person, copy]);
    assert_eq!(store.related_many(person, "cars"), vec![car]);
}

#[test]
fn test_many_to_many_without_reverse_side() {
    let (schema, mut store) = store();
    let (person, _) = person_with_car(&mut store);
    let coin = store.create("Coin", json!({ "value": 1 })).unwrap();
    store.push_related(coin, "people", person).unwrap();

    let copy = DeepCloner::new(&*schema)
        .clone(&mut store, coin, &Options::new().include("people"))
        .unwrap();

    assert_eq!(store.related_many(copy, "people"), vec![person]);
    assert_eq!(store.get(copy, "value"), Some(json!(1)));
}

#[test]
fn test_through_relationship_with_if_condition() {
    let (schema, mut store) = store();
    let (student, subjects) = student_with_subjects(&mut store);

    let options = Options::new().include(Spec::conditional("subjects", Cond::when(named("subject 2"))));
    let copy = DeepCloner::new(&*schema).clone(&mut store, student, &options).unwrap();

    assert_eq!(store.related_many(copy, "subjects"), vec![subjects[1]]);
    assert_eq!(store.related_many(subjects[1], "students"), vec![student, copy]);
    assert_eq!(store.related_many(subjects[0], "students"), vec![student]);
}

#[test]
fn test_through_relationship_with_unless_condition() {
    let (schema, mut store) = store();
    let (student, subjects) = student_with_subjects(&mut store);

    let options = Options::new().include(Spec::conditional("subjects", Cond::unless(named("subject 2"))));
    let copy = DeepCloner::new(&*schema).clone(&mut store, student, &options).unwrap();

    assert_eq!(store.related_many(copy, "subjects"), vec![subjects[0]]);
}

#[test]
fn test_conditions_are_ored() {
    let (schema, mut store) = store();
    let (student, subjects) = student_with_subjects(&mut store);

    let condition = Cond::when(named("subject 2")).with_unless(named("subject 2"));
    let options = Options::new().include(Spec::conditional("subjects", condition));
    let copy = DeepCloner::new(&*schema).clone(&mut store, student, &options).unwrap();

    assert_eq!(store.related_many(copy, "subjects"), subjects);
}

#[test]
fn test_condition_on_has_many_with_nested_include() {
    let (schema, mut store) = store();
    let (student, _) = student_with_subjects(&mut store);

    let second = |store: &MemoryStore, assignment: RecordId| {
        store
            .related_one(assignment, "subject")
            .map_or(false, |subject| store.get(subject, "name") == Some(json!("subject 2")))
    };
    let options = Options::new().include(Spec::nested_conditional(
        "student_assignments",
        "subject",
        Cond::when(second),
    ));
    let copy = DeepCloner::new(&*schema).clone(&mut store, student, &options).unwrap();

    let assignments = store.related_many(copy, "student_assignments");
    assert_eq!(assignments.len(), 1);
    let subject = store.related_one(assignments[0], "subject").unwrap();
    assert_eq!(name_of(&store, subject), json!("subject 2"));
    assert!(store.is_new_record(subject));
}

#[test]
fn test_has_one_through_links_the_far_record() {
    let (schema, mut store) = store();
    let (student, subjects) = student_with_subjects(&mut store);

    let copy = DeepCloner::new(&*schema)
        .clone(&mut store, subjects[0], &Options::new().include("head_student"))
        .unwrap();

    assert_eq!(store.related_one(copy, "head_student"), Some(student));
    assert!(store.related_many(student, "subjects").contains(&copy));
}

#[test]
fn test_conditional_has_one_through() {
    let (schema, mut store) = store();
    let (student, subjects) = student_with_subjects(&mut store);

    let rejected = Options::new().include(Spec::conditional("head_student", Cond::when(named("Someone else"))));
    let copy = DeepCloner::new(&*schema).clone(&mut store, subjects[0], &rejected).unwrap();
    assert_eq!(store.get_related(copy, "head_student"), Related::One(None));
    assert!(!store.related_many(student, "subjects").contains(&copy));

    let accepted = Options::new().include(Spec::conditional("head_student", Cond::when(named("Parent"))));
    let copy = DeepCloner::new(&*schema).clone(&mut store, subjects[0], &accepted).unwrap();
    assert_eq!(store.related_one(copy, "head_student"), Some(student));
    assert_eq!(store.records_of("Student"), vec![student]);
}

#[test]
fn test_self_referential_has_many() {
    let (schema, mut store) = store();
    let root = part_tree(&mut store);

    let options = Options::new().include(Spec::map(vec![("child_parts", "child_parts")]));
    let copy = DeepCloner::new(&*schema).clone(&mut store, root, &options).unwrap();
    save_graph(&schema, &mut store, copy);

    let children = store.related_many(copy, "child_parts");
    assert_eq!(children.len(), 2);
    for child in children {
        assert!(!store.related_many(root, "child_parts").contains(&child));
        assert_eq!(store.get(child, "parent_part_id"), Some(id(&store, copy)));

        let grandchildren = store.related_many(child, "child_parts");
        assert_eq!(grandchildren.len(), 1);
        assert_eq!(store.get(grandchildren[0], "parent_part_id"), Some(id(&store, child)));
    }
}

#[test]
fn test_dictionary_hit_relinks_joined_records() {
    let (schema, mut store) = store();
    let site = site(&mut store);
    let apartments_before = store.records_of("Apartment").len();

    let options = Options::new()
        .include(Spec::list(vec![
            Spec::from("apartments"),
            Spec::map(vec![("contractors", "apartments")]),
        ]))
        .use_dictionary(true);
    let copy = DeepCloner::new(&*schema).clone(&mut store, site.building, &options).unwrap();

    let apartments = store.related_many(copy, "apartments");
    let contractor = store.related_one(copy, "contractors").unwrap();
    assert_ne!(contractor, site.contractor);
    assert_eq!(store.related_many(contractor, "apartments"), apartments);
    assert_eq!(store.records_of("Apartment").len(), apartments_before + 2);
    assert_eq!(store.related_many(site.contractor, "apartments"), site.apartments);
}

#[test]
fn test_joined_records_without_dictionary_entry_are_shared() {
    let (schema, mut store) = store();
    let site = site(&mut store);

    let options = Options::new()
        .include(Spec::map(vec![("contractors", "apartments")]))
        .use_dictionary(true);
    let copy = DeepCloner::new(&*schema).clone(&mut store, site.building, &options).unwrap();

    let contractor = store.related_one(copy, "contractors").unwrap();
    assert_eq!(store.related_many(contractor, "apartments"), site.apartments);
    for apartment in &site.apartments {
        assert_eq!(
            store.related_many(*apartment, "contractors"),
            vec![site.contractor, contractor]
        );
    }
}

#[test]
fn test_callback_runs_after_relationships_at_every_level() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);
    let log = Rc::new(RefCell::new(Vec::new()));

    let callback_log = Rc::clone(&log);
    let post_log = Rc::clone(&log);
    let options = Options::new()
        .include("mateys")
        .callback(move |store, original, copy| {
            let linked = store.related_many(copy, "mateys").len();
            callback_log
                .borrow_mut()
                .push(format!("callback {} ({} mateys)", store.model_name(original), linked));
        })
        .postprocessor(move |store, original, _| {
            post_log.borrow_mut().push(format!("post {}", store.model_name(original)));
        });
    DeepCloner::new(&*schema).clone(&mut store, crew.jack, &options).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "callback Matey (0 mateys)",
            "post Matey",
            "callback Pirate (1 mateys)",
            "post Pirate",
        ]
    );
}

#[test]
fn test_preprocessor_runs_before_filters() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let options = Options::new()
        .include("mateys")
        .except(["age"])
        .preprocessor(|store, _, copy| {
            store.set(copy, "name", json!("Cloned"));
            if store.model_name(copy) == "Pirate" {
                store.set(copy, "age", json!("99"));
            }
        });
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &options).unwrap();

    assert_eq!(name_of(&store, copy), json!("Cloned"));
    assert_eq!(store.get(copy, "age"), Some(Value::Null));
    let matey = store.related_one(copy, "mateys").unwrap();
    assert_eq!(name_of(&store, matey), json!("Cloned"));
}

#[test]
fn test_hooks_skip_dictionary_hits() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);
    let visits = Rc::new(RefCell::new(0));

    let counter = Rc::clone(&visits);
    let options = Options::new()
        .include(Spec::list(vec![
            Spec::from("mateys"),
            Spec::map(vec![("treasures", "matey")]),
        ]))
        .use_dictionary(true)
        .postprocessor(move |_, _, _| *counter.borrow_mut() += 1);
    DeepCloner::new(&*schema).clone(&mut store, crew.jack, &options).unwrap();

    // pirate, matey, treasure
    assert_eq!(*visits.borrow(), 3);
}

#[test]
fn test_validate_false_marks_every_copy() {
    let (schema, mut store) = store();
    let parent = store.create("ParentWithValidation", json!({ "name": "parent" })).unwrap();
    let child = store.create("ChildWithValidation", json!({ "name": "child" })).unwrap();
    store.push_related(parent, "children", child).unwrap();

    let options = Options::new()
        .include("children")
        .except(AttributeFilter::new().attribute("name").nested("children", "name"))
        .validate(false);
    let copy = DeepCloner::new(&*schema).clone(&mut store, parent, &options).unwrap();

    let children = store.related_many(copy, "children");
    assert!(store.skips_validation(copy));
    assert!(store.skips_validation(children[0]));
    assert!(!store.skips_validation(parent));
    assert!(!store.skips_validation(child));
    assert_eq!(name_of(&store, children[0]), Value::Null);
}

#[test]
fn test_missing_association_fails() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let result = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &Options::new().include("parrots"));
    match result {
        Err(CloneError::AssociationNotFound { model, relationship }) => {
            assert_eq!(model, "Pirate");
            assert_eq!(relationship, "parrots");
        }
        other => panic!("expected AssociationNotFound, got {:?}", other),
    }

    let nested = Options::new().include(Spec::map(vec![("mateys", "ship")]));
    let result = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &nested);
    assert!(result.unwrap_err().is_association_not_found());
}

#[test]
fn test_missing_association_can_be_skipped() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let options = Options::new()
        .include(Spec::list(vec!["parrots", "mateys"]))
        .skip_missing_associations(true);
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &options).unwrap();

    assert_eq!(store.related_many(copy, "mateys").len(), 1);
}

#[test]
fn test_options_from_json() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let options = Options::new()
        .include_json(&json!(["parrot", { "treasures": ["gold_pieces"] }]))
        .unwrap()
        .except(AttributeFilter::from_json(&json!(["age", { "parrot": "name" }])).unwrap());
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &options).unwrap();

    assert_eq!(store.get(copy, "age"), Some(Value::Null));
    let parrot = store.related_one(copy, "parrot").unwrap();
    assert_eq!(name_of(&store, parrot), Value::Null);
    let treasure = store.related_one(copy, "treasures").unwrap();
    assert_eq!(store.related_many(treasure, "gold_pieces").len(), 1);
}

#[test]
fn test_unknown_exception_fails_before_copying() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);
    let records = store.len();

    let result = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &Options::new().except("bogus"));
    match result {
        Err(CloneError::InvalidOptions(message)) => assert!(message.contains("bogus")),
        other => panic!("expected InvalidOptions, got {:?}", other),
    }
    assert_eq!(store.len(), records);
    assert!(!store.attributes(crew.jack).contains_key("bogus"));

    let nested = Options::new()
        .include("parrot")
        .except(AttributeFilter::new().nested("parrot", "bogus"));
    let result = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &nested);
    assert!(matches!(result, Err(CloneError::InvalidOptions(_))));
}

#[test]
fn test_null_nested_only_leaves_child_unfiltered() {
    let (schema, mut store) = store();
    let crew = crew(&mut store);

    let options = Options::new()
        .include("parrot")
        .only(AttributeFilter::from_json(&json!(["name", { "parrot": null }])).unwrap());
    let copy = DeepCloner::new(&*schema).clone(&mut store, crew.jack, &options).unwrap();

    assert_eq!(name_of(&store, copy), json!("Jack Sparrow"));
    assert_eq!(store.get(copy, "age"), Some(Value::Null));
    let parrot = store.related_one(copy, "parrot").unwrap();
    assert_eq!(name_of(&store, parrot), json!("Polly"));
}
