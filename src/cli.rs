//! Terminal front end: the home menu, the three flows, the plan card with
//! its step explainer, and the chat.

use std::future::Future;
use std::io::{self, Write as _};
use std::str::FromStr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use self_defi::adapters::LocalFileExporter;
use self_defi::application::chat::SendRejection;
use self_defi::application::{
    AiTrustFlow, BackupFlow, ChatLauncher, ChatWidget, CryptoFlow, OpenChatRequest, PlanFlow,
    Questionnaire, SendOutcome, StepExplainer, SubmitOutcome, EXPLAINER_DISCLAIMER,
};
use self_defi::domain::chat::{ChatMessage, ChatRole};
use self_defi::domain::foundation::{MessageId, TopicContext};
use self_defi::domain::guidance::INTRO_VIDEO_URL;
use self_defi::domain::plan::{
    ActionPlan, BackupSecurity, BackupStorage, CryptoExperience, CryptoUrgency, AI_TOOL_PRESETS,
};
use self_defi::ports::{AiGateway, GatewayMode, PlanExporter};

pub struct App {
    pub gateway: Arc<dyn AiGateway>,
    pub chat: Arc<ChatWidget>,
    pub launcher: ChatLauncher,
    pub exporter: LocalFileExporter,
}

/// Where to go after a plan card closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Again,
    Menu,
}

struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// `None` once stdin is closed.
    async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        print!("{}", label);
        io::stdout().flush()?;
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_string()))
    }
}

impl App {
    pub async fn run(self) -> io::Result<()> {
        let mut console = Console::new();

        println!("Self-Defi Security Guide");
        if self.gateway.mode() == GatewayMode::Offline {
            println!("Running in offline mode: answers are generated locally.");
        }
        println!("Intro video: {}", INTRO_VIDEO_URL);

        loop {
            self.chat.set_context(TopicContext::Home);
            println!();
            println!("  1) Secure My Crypto");
            println!("  2) Back Up My Accounts");
            println!("  3) AI Trust Check");
            println!("  4) Ask the guide");
            println!("  q) Quit");

            let Some(choice) = console.prompt("> ").await? else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => self.crypto_flow(&mut console).await?,
                "2" => self.backup_flow(&mut console).await?,
                "3" => self.ai_trust_flow(&mut console).await?,
                "4" => self.chat_loop(&mut console).await?,
                "q" | "quit" => return Ok(()),
                _ => println!("Pick 1-4, or q to quit."),
            }
        }
    }

    async fn crypto_flow(&self, console: &mut Console) -> io::Result<()> {
        let flow = CryptoFlow::new(Arc::clone(&self.gateway));
        self.chat.set_context(flow.context());

        loop {
            let Some(experience) = choose(
                console,
                "What best describes your self-custody experience?",
                CryptoExperience::all(),
                |e| e.label().to_string(),
            )
            .await?
            else {
                break;
            };
            let Some(urgency) = choose(
                console,
                "How urgent is it for you to move some crypto off risky setups?",
                CryptoUrgency::all(),
                |u| format!("{} - {}", u.label(), u.description()),
            )
            .await?
            else {
                break;
            };

            flow.edit(|q| {
                q.select_experience(experience);
                q.select_urgency(urgency);
            });
            if self.drive(console, &flow).await? == Next::Menu {
                break;
            }
        }
        flow.detach();
        Ok(())
    }

    async fn backup_flow(&self, console: &mut Console) -> io::Result<()> {
        let flow = BackupFlow::new(Arc::clone(&self.gateway));
        self.chat.set_context(flow.context());

        loop {
            let Some(storage) = choose(
                console,
                "How do you currently store most of your passwords?",
                BackupStorage::all(),
                |s| s.label().to_string(),
            )
            .await?
            else {
                break;
            };
            let Some(security) = choose(
                console,
                "What's your preferred security approach?",
                BackupSecurity::all(),
                |s| s.label().to_string(),
            )
            .await?
            else {
                break;
            };

            flow.edit(|q| {
                q.select_storage(storage);
                q.select_security(security);
            });
            if self.drive(console, &flow).await? == Next::Menu {
                break;
            }
        }
        flow.detach();
        Ok(())
    }

    async fn ai_trust_flow(&self, console: &mut Console) -> io::Result<()> {
        let flow = AiTrustFlow::new(Arc::clone(&self.gateway));
        self.chat.set_context(flow.context());

        loop {
            println!();
            println!("Which AI tool are you about to use? Pick one or type a name or URL.");
            for (i, preset) in AI_TOOL_PRESETS.iter().enumerate() {
                println!("  {}) {}", i + 1, preset);
            }
            let Some(input) = console.prompt("tool> ").await? else {
                break;
            };
            if input.is_empty() {
                break;
            }
            let tool = input
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| AI_TOOL_PRESETS.get(i))
                .map(|preset| preset.to_string())
                .unwrap_or(input);

            flow.edit(|q| q.set_tool(tool));
            if self.drive(console, &flow).await? == Next::Menu {
                break;
            }
        }
        flow.detach();
        Ok(())
    }

    /// Submits the flow and shows the resulting plan card.
    async fn drive<Q: Questionnaire>(
        &self,
        console: &mut Console,
        flow: &PlanFlow<Q>,
    ) -> io::Result<Next> {
        println!("Generating your plan...");
        match flow.submit().await {
            SubmitOutcome::Displayed => {
                let next = match flow.plan() {
                    Some(plan) => self.plan_card(console, &plan, flow.context()).await?,
                    None => Next::Menu,
                };
                flow.reset();
                Ok(next)
            }
            SubmitOutcome::Failed => {
                if let Some(alert) = flow.take_alert() {
                    println!("! {}", alert);
                }
                Ok(Next::Again)
            }
            SubmitOutcome::Incomplete => {
                println!("Please complete every question first.");
                Ok(Next::Again)
            }
            SubmitOutcome::Ignored | SubmitOutcome::Detached => Ok(Next::Menu),
        }
    }

    async fn plan_card(
        &self,
        console: &mut Console,
        plan: &ActionPlan,
        context: TopicContext,
    ) -> io::Result<Next> {
        let explainer = StepExplainer::new(Arc::clone(&self.gateway));
        print_plan(plan);

        let next = loop {
            println!();
            let n = plan.steps().len();
            println!("[1-{n}] explain a step  [a1-a{n}] ask the guide about a step");
            println!("[c] copy  [d] download  [r] start over  [m] menu");
            let Some(input) = console.prompt("plan> ").await? else {
                break Next::Menu;
            };

            match input.as_str() {
                "c" => {
                    println!();
                    println!("{}", plan.to_export_text());
                }
                "d" => match self.exporter.export(plan).await {
                    Ok(receipt) => println!(
                        "Saved {} ({} bytes)",
                        receipt.path.display(),
                        receipt.bytes_written
                    ),
                    Err(err) => {
                        tracing::error!(error = %err, "Plan export failed");
                        println!("! Could not save the plan. Please try again.");
                    }
                },
                "r" => break Next::Again,
                "m" | "" => break Next::Menu,
                other => {
                    let (ask, number) = match other.strip_prefix('a') {
                        Some(rest) => (true, rest),
                        None => (false, other),
                    };
                    let step = number
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| plan.steps().get(i));
                    match step {
                        Some(step) if ask => self.ask_guide(console, step, context).await?,
                        Some(step) => explain(&explainer, step, context).await,
                        None => println!("No such option."),
                    }
                }
            }
        };

        explainer.detach();
        Ok(next)
    }

    /// Hands the step to the chat through the launcher, then opens the chat.
    async fn ask_guide(
        &self,
        console: &mut Console,
        step: &str,
        context: TopicContext,
    ) -> io::Result<()> {
        let request = OpenChatRequest::about_step(step, context);
        let prefill = request.prefill.clone();
        let mut updates = self.chat.subscribe();

        if let Err(err) = self.launcher.open(request) {
            tracing::warn!(error = %err, "Could not open the chat");
            return Ok(());
        }
        if updates.wait_for(|s| s.is_open && s.draft == prefill).await.is_err() {
            return Ok(());
        }
        self.chat_loop(console).await
    }

    async fn chat_loop(&self, console: &mut Console) -> io::Result<()> {
        self.chat.open();
        let snapshot = self.chat.snapshot();

        println!();
        println!(
            "Chat ({}). Type a question, /1-/{} for a quick prompt, /q to leave.",
            snapshot.context,
            self.chat.quick_prompts().len()
        );
        for (i, prompt) in self.chat.quick_prompts().iter().enumerate() {
            println!("  /{} {}", i + 1, prompt);
        }
        for message in &snapshot.messages {
            print_message(message);
        }

        loop {
            let draft = self.chat.snapshot().draft;
            if !draft.is_empty() {
                println!("(draft) {}  [Enter to send]", draft);
            }
            let Some(line) = console.prompt("you> ").await? else {
                break;
            };

            let outcome = match line.as_str() {
                "/q" => break,
                "" if !draft.is_empty() => self.stream_reply(self.chat.send_draft()).await,
                "" => continue,
                other => match other
                    .strip_prefix('/')
                    .and_then(|n| n.parse::<usize>().ok())
                    .and_then(|n| n.checked_sub(1))
                {
                    Some(index) => match self.chat.quick_prompts().get(index) {
                        Some(prompt) => self.stream_reply(self.chat.send(prompt)).await,
                        None => continue,
                    },
                    None => self.stream_reply(self.chat.send(other)).await,
                },
            };

            if outcome == SendOutcome::Rejected(SendRejection::InFlight) {
                println!("Still answering, one moment.");
            }
        }

        self.chat.close();
        Ok(())
    }

    /// Drives a send while printing the reply as it streams in.
    async fn stream_reply(&self, send: impl Future<Output = SendOutcome>) -> SendOutcome {
        let mut updates = self.chat.subscribe();
        let mut printer = ReplyPrinter::default();
        tokio::pin!(send);

        let outcome = loop {
            tokio::select! {
                outcome = &mut send => break outcome,
                changed = updates.changed() => {
                    if changed.is_err() {
                        break (&mut send).await;
                    }
                    let messages = updates.borrow_and_update().messages.clone();
                    printer.show(&messages);
                }
            }
        };

        printer.show(&self.chat.messages());
        println!();
        outcome
    }
}

/// Prints the growing tail of the newest assistant message.
#[derive(Debug, Default)]
struct ReplyPrinter {
    current: Option<MessageId>,
    printed: usize,
}

impl ReplyPrinter {
    fn show(&mut self, messages: &[ChatMessage]) {
        let Some(last) = messages.last() else {
            return;
        };
        if last.role != ChatRole::Assistant {
            return;
        }
        if self.current != Some(last.id) {
            if self.current.is_some() {
                println!();
            }
            self.current = Some(last.id);
            self.printed = 0;
            print!("guide> ");
        }
        if let Some(delta) = last.text.get(self.printed..) {
            print!("{}", delta);
            self.printed = last.text.len();
        }
        let _ = io::stdout().flush();
    }
}

async fn choose<T, F>(
    console: &mut Console,
    question: &str,
    options: &[T],
    label: F,
) -> io::Result<Option<T>>
where
    T: Copy + FromStr,
    F: Fn(&T) -> String,
{
    println!();
    println!("{}", question);
    for (i, option) in options.iter().enumerate() {
        println!("  {}) {}", i + 1, label(option));
    }

    loop {
        let Some(input) = console.prompt("> ").await? else {
            return Ok(None);
        };
        if input.is_empty() {
            return Ok(None);
        }
        match input.parse::<T>() {
            Ok(answer) => return Ok(Some(answer)),
            Err(_) => println!("Pick 1-{}, or press Enter to go back.", options.len()),
        }
    }
}

async fn explain(explainer: &StepExplainer, step: &str, context: TopicContext) {
    println!("Loading explainer...");
    explainer.open(step, context).await;
    let view = explainer.view();

    println!();
    println!("Step: \"{}\"", step);
    if let Some(url) = view.video_url {
        println!("Video: {}", url);
    }
    if let Some(text) = view.explanation.as_deref().or(view.error) {
        println!();
        println!("{}", text);
    }
    println!();
    println!("{}", EXPLAINER_DISCLAIMER);
    explainer.close();
}

fn print_plan(plan: &ActionPlan) {
    println!();
    println!("{}", plan.title());
    println!("({})", plan.timeframe());
    println!();
    for (i, step) in plan.steps().iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
    println!();
    println!("Note: {}", plan.notes());
}

fn print_message(message: &ChatMessage) {
    match message.role {
        ChatRole::User => println!("you> {}", message.text),
        ChatRole::Assistant => println!("guide> {}", message.text),
    }
}
