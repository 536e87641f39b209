//! End-to-end reasoning scenarios driven through the public API.

use nars::budget::Budget;
use nars::config::{ForgetPolicy, ReasonerConfig};
use nars::event::{EventKind, EventPayload};
use nars::stamp::OccurrenceTime;
use nars::task::{Punctuation, Task, TaskBuilder};
use nars::truth::Truth;
use nars::{SubmitOutcome, NAR};

fn nar() -> NAR {
    NAR::new(ReasonerConfig::default()).unwrap()
}

#[test]
fn syllogistic_deduction() {
    let mut n = nar();
    assert!(n.submit("<bird --> animal>. %1.0;0.9%").is_accepted());
    assert!(n.submit("<robin --> bird>. %1.0;0.9%").is_accepted());

    n.step(100);

    let conclusion = n.term("<robin --> animal>").unwrap();
    let belief = n.query(&conclusion).expect("deduction reached");
    let truth = belief.truth().unwrap();
    assert!((truth.frequency() - 1.0).abs() < 1.0e-3);
    assert!((truth.confidence() - 0.81).abs() < 1.0e-2);
}

#[test]
fn revision_merges_disjoint_evidence() {
    let mut n = nar();
    assert_eq!(
        n.submit("<a --> b>. %0.8;0.9%"),
        SubmitOutcome::Accepted { revised: false }
    );
    assert_eq!(
        n.submit("<a --> b>. %0.6;0.9%"),
        SubmitOutcome::Accepted { revised: true }
    );

    let term = n.term("<a --> b>").unwrap();
    let view = n.get_concept(&term).unwrap();
    assert_eq!(view.beliefs, 1);

    let belief = n.query(&term).unwrap();
    let truth = belief.truth().unwrap();
    assert!((truth.frequency() - 0.7).abs() < 1.0e-3);
    assert!((truth.confidence() - 0.9474).abs() < 1.0e-3);
}

#[test]
fn priority_forgetting_evicts_weakest_concept() {
    let mut config = ReasonerConfig::default();
    config.max_concepts = 3;
    let mut n = NAR::new(config).unwrap();

    let mut submit = |n: &mut NAR, term: &str, priority: f32| {
        let term = n.term(term).unwrap();
        let task = TaskBuilder::new()
            .term(term)
            .punctuation(Punctuation::Belief)
            .truth(Truth::default_judgment())
            .budget(Budget::new(priority, 0.8, 0.5))
            .build()
            .unwrap();
        assert!(n.submit_task(task).is_accepted());
    };

    submit(&mut n, "<a --> x>", 0.4);
    submit(&mut n, "<b --> x>", 0.2);
    submit(&mut n, "<c --> x>", 0.5);
    assert_eq!(n.stats().concepts, 3);

    submit(&mut n, "<d --> x>", 0.9);
    assert_eq!(n.stats().concepts, 3);

    // The lowest-priority concept among the first three is gone.
    assert!(n.get_concept(&n.term("<b --> x>").unwrap()).is_none());
    assert!(n.get_concept(&n.term("<a --> x>").unwrap()).is_some());
    assert!(n.get_concept(&n.term("<c --> x>").unwrap()).is_some());
    assert!(n.get_concept(&n.term("<d --> x>").unwrap()).is_some());
}

#[test]
fn lru_forgetting_keeps_touched_concepts() {
    let mut config = ReasonerConfig::default();
    config.max_concepts = 2;
    config.forget_policy = ForgetPolicy::Lru;
    let mut n = NAR::new(config).unwrap();

    n.submit("<a --> x>.");
    n.submit("<b --> x>.");
    let a = n.term("<a --> x>").unwrap();
    assert!(n.touch_concept(&a).is_some());
    n.submit("<c --> x>.");

    assert!(n.get_concept(&a).is_some());
    assert!(n.get_concept(&n.term("<c --> x>").unwrap()).is_some());
    assert!(n.get_concept(&n.term("<b --> x>").unwrap()).is_none());
}

#[test]
fn question_answered_within_a_step() {
    let mut n = nar();
    n.submit("<bird --> animal>. %1.0;0.9%");

    let events = n.events();
    assert!(n.submit("<bird --> animal>?").is_accepted());

    let term = n.term("<bird --> animal>").unwrap();
    let answer = n.query(&term).expect("belief available");
    assert!((answer.truth().unwrap().frequency() - 1.0).abs() < 1.0e-4);

    // The output event carries the answering belief, already at submission.
    let mut saw_output = false;
    while let Ok(event) = events.try_recv() {
        if event.kind == EventKind::Output {
            if let EventPayload::Task(task) = event.payload {
                assert_eq!(task.term(), &term);
                saw_output = true;
            }
        }
    }
    assert!(saw_output);
}

#[test]
fn goal_decomposes_into_subgoal() {
    let mut n = nar();
    assert!(n.submit("(==>, p, q). %0.9;0.9%").is_accepted());
    assert!(n.submit("q!").is_accepted());

    n.step(40);

    let p = n.term("p").unwrap();
    let view = n.get_concept(&p).expect("subgoal concept created");
    assert!(view.goals >= 1);

    // The cached plan records the expansion.
    let q = n.term("q").unwrap();
    let plan = n.cached_plan(&q).expect("plan cached");
    assert_eq!(plan, vec![p.clone()]);

    // Subgoal desire follows deduction of the goal and the implication.
    let concept = n.get_concept(&p).unwrap();
    assert_eq!(concept.term, p);
}

#[test]
fn every_task_added_is_preceded_by_its_concept_event() {
    let mut n = nar();
    let events = n.events();

    n.submit("<robin --> bird>. %1.0;0.9%");
    n.submit("<bird --> animal>. %1.0;0.9%");
    n.submit("<robin --> bird>?");
    n.step(25);

    let log: Vec<_> = events.try_iter().collect();
    for (i, event) in log.iter().enumerate() {
        if event.kind != EventKind::TaskAdded {
            continue;
        }
        let EventPayload::Task(task) = &event.payload else {
            panic!("task.added carries a task");
        };
        let preceded = log[..i].iter().any(|e| {
            matches!(e.kind, EventKind::ConceptCreated | EventKind::ConceptAccessed)
                && matches!(&e.payload, EventPayload::Term(t) if t == task.term())
        });
        assert!(
            preceded,
            "task.added for {} lacked a concept event",
            task.term()
        );
    }
}

#[test]
fn step_events_bracket_each_cycle() {
    let mut n = nar();
    n.submit("<a --> b>.");
    let events = n.events();
    n.step(3);

    let log: Vec<_> = events.try_iter().collect();
    let starts = log.iter().filter(|e| e.kind == EventKind::StepStart).count();
    let ends = log.iter().filter(|e| e.kind == EventKind::StepEnd).count();
    assert_eq!(starts, 3);
    assert_eq!(ends, 3);
}

#[test]
fn consolidation_fires_on_interval() {
    let mut config = ReasonerConfig::default();
    config.consolidation_interval = 5;
    let mut n = NAR::new(config).unwrap();
    n.submit("<a --> b>.");

    let events = n.events();
    n.step(12);

    let log: Vec<_> = events.try_iter().collect();
    let consolidations = log
        .iter()
        .filter(|e| e.kind == EventKind::ConsolidationStart)
        .count();
    assert!(consolidations >= 2);
    assert!(log.iter().any(|e| e.kind == EventKind::ConsolidationEnd));
}

#[test]
fn derived_tasks_extend_the_evidence_trail() {
    let mut n = nar();
    n.submit("<robin --> bird>. %1.0;0.9%");
    n.submit("<bird --> animal>. %1.0;0.9%");
    n.step(100);

    let conclusion = n.term("<robin --> animal>").unwrap();
    let belief = n.query(&conclusion).unwrap();
    // Two input premises, two serials in the base.
    assert_eq!(belief.stamp().evidence().len(), 2);
}

#[test]
fn stats_stay_consistent_under_load() {
    let mut n = nar();
    for i in 0..20 {
        n.submit(&format!("<t{} --> kind>. %0.9;0.8%", i));
    }
    n.step(50);

    let stats = n.stats();
    assert!(stats.concepts <= ReasonerConfig::default().max_concepts);
    assert_eq!(stats.cycle, 50);
    let per_kind = stats.memory.beliefs + stats.memory.goals + stats.memory.questions;
    assert_eq!(stats.memory.total_tasks, per_kind);
}

#[test]
fn eternal_and_tensed_evidence_merge_to_the_later_time() {
    let mut n = nar();
    let term_a = n.term("<a --> m>").unwrap();
    let term_b = n.term("<m --> b>").unwrap();

    let eternal = Task::belief(
        term_a,
        Truth::default_judgment(),
        OccurrenceTime::Eternal,
        0,
    );
    let tensed = Task::new(
        term_b,
        Punctuation::Belief,
        Some(Truth::default_judgment()),
        nars::Stamp::input(OccurrenceTime::At(7), 0),
        Budget::default_input(),
    )
    .unwrap();

    n.submit_task(eternal);
    n.submit_task(tensed);
    n.step(60);

    let conclusion = n.term("<a --> b>").unwrap();
    let belief = n.query(&conclusion).expect("chain derived");
    assert_eq!(belief.stamp().occurrence(), OccurrenceTime::At(7));
}
