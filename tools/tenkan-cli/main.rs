use clap::Parser;
use std::io::{self, BufRead, Write};
use tenkan::ast::ExpressionTree;
use tenkan::graph::FieldOption;
use tenkan::node::Node;
use tenkan::prelude::{
    FieldSpec, FieldType, Graph, GraphDefinition, InteractionProvider, ProviderError, Value,
    ValueMap, WorkflowEngine,
};
use tenkan::services::{MockServices, ReportPipeline};
use tracing_subscriber::EnvFilter;

/// Runs a research-achievement transfer analysis workflow in the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow graph JSON file
    graph_path: String,

    /// Validate the graph and print its outline without running it
    #[arg(short, long)]
    check: bool,

    /// Generate an analysis report with the mock services after the run
    #[arg(short, long)]
    report: bool,

    /// Print the final engine state as JSON
    #[arg(short, long)]
    state: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tenkan=info,warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let definition = GraphDefinition::from_file(&cli.graph_path)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let mut engine = WorkflowEngine::builder(definition)
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Graph rejected: {}", e)));

    if cli.check {
        if let Some(graph) = engine.graph() {
            print_outline(graph);
        }
        return;
    }

    let stdin = io::stdin();
    let mut provider = TerminalProvider::new(stdin.lock(), io::stdout());
    provider.display_message("==== Research Achievement Transfer Analysis ====\n");

    // The provider already showed the error.
    if engine.run(&mut provider).is_err() {
        std::process::exit(1);
    }

    if cli.report {
        let services = MockServices;
        let report = ReportPipeline::new(&services, &services, &services)
            .run(engine.variables())
            .unwrap_or_else(|e| exit_with_error(&format!("Report generation failed: {}", e)));
        println!("\n{}", report.render());
    }

    if cli.state {
        let snapshot = serde_json::to_string_pretty(&engine.current_state())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize state: {}", e)));
        println!("{}", snapshot);
    }
}

/// Prints every node with its successors and, for conditions, the parsed expression tree.
fn print_outline(graph: &Graph) {
    println!("Workflow: {} ({} nodes)", graph.name(), graph.len());
    println!("Variables: {}", graph.variables().join(", "));
    for node in graph.nodes() {
        println!("\n[{}] {} \"{}\"", node.kind(), node.id(), node.name());
        match node {
            Node::Interaction(interaction) => {
                for field in &interaction.form {
                    let marker = if field.required { " *" } else { "" };
                    println!("  - {} ({}){}", field.key, field.field_type, marker);
                }
                if let [output] = interaction.outputs.as_slice() {
                    println!("  stores into: {}", output);
                }
            }
            Node::Condition(condition) => {
                for branch in &condition.branches {
                    println!("  if {} -> {}", branch.expression, branch.next);
                    match &branch.compiled {
                        Ok(expression) => print!("{}", ExpressionTree(expression)),
                        Err(e) => println!("  (never matches: {})", e),
                    }
                }
            }
            Node::Start(_) | Node::End(_) => {}
        }
        let successors = node.successors();
        if !successors.is_empty() {
            println!("  next: {}", successors.join(" | "));
        }
    }
}

/// An `InteractionProvider` that prompts on a line-based terminal.
struct TerminalProvider<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalProvider<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String, ProviderError> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| ProviderError::Failed(e.to_string()))?;
        if read == 0 {
            return Err(ProviderError::Closed);
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, text: &str) -> Result<(), ProviderError> {
        writeln!(self.output, "{}", text).map_err(|e| ProviderError::Failed(e.to_string()))?;
        self.output
            .flush()
            .map_err(|e| ProviderError::Failed(e.to_string()))
    }

    fn read_field(&mut self, field: &FieldSpec) -> Result<Value, ProviderError> {
        let options = field.options.as_deref().unwrap_or(&[]);
        match field.field_type {
            FieldType::Text | FieldType::File => Ok(Value::Text(self.read_line()?)),
            FieldType::Textarea => {
                self.say("(finish with an empty line)")?;
                let mut lines = Vec::new();
                loop {
                    let line = self.read_line()?;
                    if line.is_empty() {
                        break;
                    }
                    lines.push(line);
                }
                Ok(Value::Text(lines.join("\n")))
            }
            FieldType::Number => loop {
                let line = self.read_line()?;
                if line.is_empty() {
                    return Ok(Value::Absent);
                }
                if let Ok(n) = line.parse::<i64>() {
                    return Ok(Value::Integer(n));
                }
                match line.parse::<f64>() {
                    Ok(n) => return Ok(Value::Number(n)),
                    Err(_) => self.say("Please enter a valid number")?,
                }
            },
            FieldType::Radio | FieldType::Select if !options.is_empty() => {
                self.list_options(options)?;
                loop {
                    match self.read_choice(options.len())? {
                        Some(index) => return Ok(Value::Text(options[index].value.clone())),
                        None => self.say(&format!("Please choose 1-{}", options.len()))?,
                    }
                }
            }
            FieldType::Checkbox if !options.is_empty() => {
                self.list_options(options)?;
                self.say("Enter option numbers separated by commas")?;
                loop {
                    let line = self.read_line()?;
                    if line.is_empty() {
                        return Ok(Value::List(Vec::new()));
                    }
                    let picked: Option<Vec<Value>> = line
                        .split(',')
                        .map(|part| {
                            part.trim()
                                .parse::<usize>()
                                .ok()
                                .filter(|i| (1..=options.len()).contains(i))
                                .map(|i| Value::Text(options[i - 1].value.clone()))
                        })
                        .collect();
                    match picked {
                        Some(values) => return Ok(Value::List(values)),
                        None => self.say(&format!("Options must be between 1 and {}", options.len()))?,
                    }
                }
            }
            FieldType::Rating => {
                self.say("Rate from 1 to 5")?;
                loop {
                    match self.read_choice(5)? {
                        Some(index) => return Ok(Value::Integer(index as i64 + 1)),
                        None => self.say("Please enter a number between 1 and 5")?,
                    }
                }
            }
            FieldType::Radio | FieldType::Select | FieldType::Checkbox => {
                Ok(Value::Text(self.read_line()?))
            }
        }
    }

    fn list_options(&mut self, options: &[FieldOption]) -> Result<(), ProviderError> {
        for (i, option) in options.iter().enumerate() {
            self.say(&format!("{}. {}", i + 1, option.label))?;
        }
        Ok(())
    }

    /// Reads a 1-based choice and returns it as a 0-based index.
    fn read_choice(&mut self, count: usize) -> Result<Option<usize>, ProviderError> {
        let line = self.read_line()?;
        Ok(line
            .parse::<usize>()
            .ok()
            .filter(|i| (1..=count).contains(i))
            .map(|i| i - 1))
    }

    fn is_blank(value: &Value) -> bool {
        match value {
            Value::Absent => true,
            Value::Text(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl<R: BufRead, W: Write> InteractionProvider for TerminalProvider<R, W> {
    fn display_message(&mut self, message: &str) {
        let _ = self.say(message);
    }

    fn display_error(&mut self, message: &str) {
        let _ = self.say(&format!("\x1b[91mError: {}\x1b[0m", message));
    }

    fn display_form(
        &mut self,
        title: &str,
        fields: &[FieldSpec],
    ) -> Result<ValueMap, ProviderError> {
        let separator = "=".repeat(60);
        self.say(&separator)?;
        self.say(&format!("{}\n", title))?;

        let mut values = ValueMap::new();
        for field in fields {
            let marker = if field.required { " *" } else { "" };
            self.say(&format!("{}:{}", field.display_label(), marker))?;
            let value = loop {
                let value = self.read_field(field)?;
                if field.required && Self::is_blank(&value) {
                    self.display_error("This field is required, please try again");
                    continue;
                }
                break value;
            };
            if !value.is_absent() {
                values.insert(field.key.clone(), value);
            }
            self.say("")?;
        }

        self.say(&separator)?;
        Ok(values)
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
