mod config;
mod form;
mod signals;

use std::error::Error;
use std::fs::File;
use std::process::ExitCode;

use formbind::binding::{BoundForm, bind};
use formbind::signal::{Controller, form_driver};
use formbind::store::MemoryStore;
use formbind::{FormRegistry, Services};
use serde_json::{Value, json};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};

use config::DemoConfig;

fn init_logging(config: &DemoConfig) {
    let result = match &config.log_file {
        Some(path) => match File::create(path) {
            Ok(file) => WriteLogger::init(config.log_level, Config::default(), file),
            Err(e) => {
                eprintln!("Failed to create log file {}: {}", path.display(), e);
                return;
            }
        },
        None => TermLogger::init(
            config.log_level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
    };
    if let Err(e) = result {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

fn print_form(form: &BoundForm, controller: &Controller<MemoryStore>) {
    match form.props(controller.store()) {
        Ok(props) => {
            println!("submitted: {}", props.is_submitted);
            for (name, field) in &props.fields {
                println!("  {:<10} {:<12} {}", name, field.props.value, json!(field.errors));
            }
        }
        Err(e) => eprintln!("Error: {}", e),
    }
}

/// Type into a field the way a view would: through the connector, then the
/// state-changed signal.
fn type_into(
    form: &BoundForm,
    controller: &mut Controller<MemoryStore>,
    field: &str,
    value: &str,
) -> Result<(), Box<dyn Error>> {
    let props = form.props(controller.store())?;
    if let Some(field) = props.fields.get(field) {
        field.props.change(json!(value));
    }
    for change in form.changes().drain() {
        controller.run(form_driver::STATE_CHANGED, change?.to_input())?;
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut registry = FormRegistry::new();
    registry.register(form::NAME, form::test_form(), ["form"])?;
    let bound = bind(&registry, form::NAME)?;

    let store = MemoryStore::new(json!({ "form": { "fields": {}, "errors": {} } }));
    let mut controller = Controller::new(store, Services::with_forms(registry));
    signals::register(&mut controller);

    controller.run(signals::MAIN_PAGE_OPENED, Value::Null)?;
    println!("After setup:");
    print_form(&bound, &controller);

    controller.run(signals::FORM_SUBMITTED, Value::Null)?;
    println!("\nAfter first submit:");
    print_form(&bound, &controller);

    type_into(&bound, &mut controller, "password2", "foo")?;
    type_into(&bound, &mut controller, "name", "Red panda")?;
    controller.run(signals::FORM_SUBMITTED, Value::Null)?;
    println!("\nAfter fixing the form:");
    print_form(&bound, &controller);

    Ok(())
}

fn main() -> ExitCode {
    let config = DemoConfig::from_env();
    init_logging(&config);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
