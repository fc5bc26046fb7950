//! Integration tests for generator composition and queue draining.

use entigen_core::priorities::{Priority, names, resolve_order};
use entigen_core::{
    ApplicationConfig, EntityDefinition, Error, GenerationContext, Generator, GeneratorCatalog,
    Registrar, Result, Scheduler, TaskGroup,
};
use entigen_core::model::{RelationshipDefinition, RelationshipType};
use entigen_core::prepare::BootstrapGenerator;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

/// Records `<namespace>@<priority>` for every registered priority.
struct Recorder {
    namespace: String,
    depends_on: Vec<String>,
    priorities: Vec<&'static str>,
    log: Log,
}

impl Recorder {
    fn new(namespace: &str, depends_on: &[&str], priorities: &[&'static str], log: &Log) -> Self {
        Self {
            namespace: namespace.to_string(),
            depends_on: depends_on.iter().map(ToString::to_string).collect(),
            priorities: priorities.to_vec(),
            log: Arc::clone(log),
        }
    }
}

impl Generator for Recorder {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn depends_on(&self) -> Vec<String> {
        self.depends_on.clone()
    }

    fn register_tasks(&self, registrar: &mut Registrar<'_>) -> Result<()> {
        for priority in &self.priorities {
            let log = Arc::clone(&self.log);
            let entry = format!("{}@{priority}", self.namespace);
            registrar.register(
                priority,
                TaskGroup::new(*priority).task("record", move |_| {
                    log.lock().unwrap().push(entry.clone());
                    Ok(())
                }),
            )?;
        }
        Ok(())
    }
}

fn recorded(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn context() -> GenerationContext {
    GenerationContext::new(ApplicationConfig::default())
}

#[tokio::test]
async fn test_priorities_drain_in_order() {
    let log = Log::default();
    let mut scheduler = Scheduler::standard().unwrap();
    scheduler
        .compose(Arc::new(Recorder::new(
            "app",
            &[],
            &[names::END, names::WRITING, names::CONFIGURING],
            &log,
        )))
        .unwrap();

    let summary = scheduler.run(&mut context()).await.unwrap();

    assert_eq!(
        recorded(&log),
        vec!["app@configuring", "app@writing", "app@end"]
    );
    // every non-skippable priority runs, empty custom ones are skipped
    let executed: Vec<_> = summary.executed().collect();
    assert_eq!(
        executed,
        vec![
            "initializing",
            "prompting",
            "configuring",
            "default",
            "writing",
            "transform",
            "conflicts",
            "install",
            "end"
        ]
    );
    assert!(summary.skipped.contains(&"loadingEntities".to_string()));
    assert_eq!(summary.task_count(), 3);
}

#[tokio::test]
async fn test_dependencies_run_first_within_a_queue() {
    let log = Log::default();
    let mut scheduler = Scheduler::standard().unwrap();
    let base: Arc<dyn Generator> = Arc::new(Recorder::new(
        "base",
        &[],
        &[names::WRITING],
        &log,
    ));
    scheduler.catalog_mut().register("base", {
        let base = Arc::clone(&base);
        move || Arc::clone(&base)
    });

    let composed = scheduler
        .compose(Arc::new(Recorder::new(
            "app",
            &["base"],
            &[names::PREPARING, names::WRITING],
            &log,
        )))
        .unwrap();
    assert!(composed);
    assert_eq!(scheduler.namespaces().collect::<Vec<_>>(), vec!["base", "app"]);

    scheduler.run(&mut context()).await.unwrap();
    assert_eq!(
        recorded(&log),
        vec!["app@preparing", "base@writing", "app@writing"]
    );
}

#[tokio::test]
async fn test_composition_order_breaks_ties() {
    let log = Log::default();
    let mut scheduler = Scheduler::standard().unwrap();
    for namespace in ["first", "second", "third"] {
        scheduler
            .compose(Arc::new(Recorder::new(namespace, &[], &[names::DEFAULT], &log)))
            .unwrap();
    }
    scheduler.run(&mut context()).await.unwrap();
    assert_eq!(
        recorded(&log),
        vec!["first@default", "second@default", "third@default"]
    );
}

#[tokio::test]
async fn test_executed_generators_are_not_run_again() {
    let log = Log::default();
    let mut scheduler = Scheduler::standard().unwrap();
    let app = Arc::new(Recorder::new("app", &[], &[names::DEFAULT], &log));
    assert!(scheduler.compose(app.clone()).unwrap());
    assert!(!scheduler.compose(app.clone()).unwrap());

    scheduler.run(&mut context()).await.unwrap();
    assert!(scheduler.has_executed("app"));
    assert!(!scheduler.compose(app).unwrap());

    let summary = scheduler.run(&mut context()).await.unwrap();
    assert_eq!(recorded(&log), vec!["app@default"]);
    assert_eq!(summary.task_count(), 0);
}

#[test]
fn test_unknown_priority_fails_at_registration() {
    let log = Log::default();
    let mut scheduler = Scheduler::standard().unwrap();
    let error = scheduler
        .compose(Arc::new(Recorder::new("app", &[], &["publishing"], &log)))
        .unwrap_err();

    assert!(matches!(
        error,
        Error::UnknownPriority { ref name, ref generator } if name == "publishing" && generator == "app"
    ));
    // nothing was composed or queued
    assert!(!scheduler.is_composed("app"));
}

#[test]
fn test_direct_registration_checks_priority() {
    let log = Log::default();
    let mut scheduler = Scheduler::standard().unwrap();
    scheduler
        .compose(Arc::new(Recorder::new("app", &[], &[], &log)))
        .unwrap();

    let error = scheduler
        .register_tasks("app", "nowhere", TaskGroup::new("extra"))
        .unwrap_err();
    assert!(matches!(error, Error::UnknownPriority { .. }));

    scheduler
        .register_tasks("app", names::WRITING, TaskGroup::new("extra"))
        .unwrap();
    let error = scheduler
        .register_tasks("ghost", names::WRITING, TaskGroup::new("extra"))
        .unwrap_err();
    assert!(matches!(error, Error::UnknownGenerator { .. }));
}

#[test]
fn test_unknown_dependency() {
    let log = Log::default();
    let mut scheduler = Scheduler::standard().unwrap();
    let error = scheduler
        .compose(Arc::new(Recorder::new("app", &["missing"], &[], &log)))
        .unwrap_err();
    assert!(matches!(
        error,
        Error::UnknownGenerator { ref namespace, ref required_by }
            if namespace == "missing" && required_by.as_deref() == Some("app")
    ));
}

#[test]
fn test_cyclic_dependency() {
    let log = Log::default();
    let mut catalog = GeneratorCatalog::new();
    for (namespace, dependency) in [("a", "b"), ("b", "a")] {
        let log = Arc::clone(&log);
        catalog.register(namespace, move || {
            Arc::new(Recorder::new(namespace, &[dependency], &[], &log)) as Arc<dyn Generator>
        });
    }
    let order = entigen_core::standard_order().unwrap().clone();
    let mut scheduler = Scheduler::new(order, catalog);

    let error = scheduler.compose_with("a").unwrap_err();
    assert!(matches!(
        error,
        Error::CyclicDependency { ref members } if members == &["a", "b", "a"]
    ));
}

#[tokio::test]
async fn test_failure_aborts_and_names_the_phase() {
    struct Failing;

    impl Generator for Failing {
        fn namespace(&self) -> &str {
            "failing"
        }

        fn register_tasks(&self, registrar: &mut Registrar<'_>) -> Result<()> {
            registrar.register(
                names::PREPARING,
                TaskGroup::new("broken").task("explode", |_| Err(Error::merge("boom"))),
            )
        }
    }

    let log = Log::default();
    let mut scheduler = Scheduler::standard().unwrap();
    scheduler.compose(Arc::new(Failing)).unwrap();
    scheduler
        .compose(Arc::new(Recorder::new("later", &[], &[names::WRITING], &log)))
        .unwrap();

    let error = scheduler.run(&mut context()).await.unwrap_err();
    assert_eq!(error.phase(), Some("preparing"));
    assert!(matches!(error.root_cause(), Error::Merge { .. }));
    assert!(error.to_string().contains("explode"));
    assert!(recorded(&log).is_empty());
}

#[tokio::test]
async fn test_custom_order() {
    let log = Log::default();
    let fixed = [Priority::fixed("start"), Priority::fixed("finish")];
    let custom = [Priority::custom("middle", "finish")];
    let order = resolve_order(&custom, &fixed).unwrap();
    let mut scheduler = Scheduler::new(order, GeneratorCatalog::new());
    scheduler
        .compose(Arc::new(Recorder::new("app", &[], &["finish", "middle"], &log)))
        .unwrap();

    scheduler.run(&mut context()).await.unwrap();
    assert_eq!(recorded(&log), vec!["app@middle", "app@finish"]);
}

#[tokio::test]
async fn test_unresolved_reference_stops_later_phases() {
    let log = Log::default();
    let mut scheduler = Scheduler::standard().unwrap();
    scheduler.compose(Arc::new(BootstrapGenerator)).unwrap();
    scheduler
        .compose(Arc::new(Recorder::new(
            "writer",
            &["bootstrap-application"],
            &[names::POST_PREPARING_EACH_ENTITY, names::WRITING_ENTITIES],
            &log,
        )))
        .unwrap();

    let mut order = EntityDefinition::named("Order");
    order
        .relationships
        .push(RelationshipDefinition::new(RelationshipType::ManyToOne, "Ghost"));
    let mut ctx = GenerationContext::with_definitions(ApplicationConfig::default(), [order]);

    let error = scheduler.run(&mut ctx).await.unwrap_err();
    assert_eq!(error.phase(), Some("preparingEachEntityRelationship"));
    assert!(matches!(
        error.root_cause(),
        Error::UnresolvedEntityReference { other_entity, .. } if other_entity == "Ghost"
    ));
    assert!(recorded(&log).is_empty());
    assert!(!ctx.entities.is_frozen("Order"));
}
