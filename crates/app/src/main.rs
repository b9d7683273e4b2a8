use std::{error::Error, path::PathBuf};

use clap::{Args, Parser, Subcommand};

use ledger::{
    CardLimits, JsonFileBackend, LedgerStore, Limit, LoanProject, Money, TransferEngine,
    TransferKind, TransferOutcome, User, compute_amortization, reveal_pin, set_limits, set_lock,
};

#[derive(Parser, Debug)]
#[command(name = "horizon")]
#[command(about = "Banque Horizon — retail-banking core over a local snapshot store")]
struct Cli {
    /// Snapshot file standing in for the bank's core ledger.
    #[arg(long, env = "LEDGER_STORE", default_value = "./horizon.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Balances, cards and recent transactions.
    Overview,
    /// Two-phase funds transfer from the checking account.
    Transfer(Transfer),
    /// Card controls (limits, opposition, PIN).
    Card(Card),
    /// Credit simulation, no ledger involved.
    Simulate(Simulate),
}

#[derive(Args, Debug)]
struct Transfer {
    /// Beneficiary IBAN.
    #[arg(long)]
    to: String,

    /// Amount in euros, e.g. `500` or `120,50`.
    #[arg(long)]
    amount: String,

    #[arg(long)]
    reason: Option<String>,

    /// Send a notification to this address.
    #[arg(long)]
    email: Option<String>,

    /// `ponctuel`, `programme` or `permanent`.
    #[arg(long, default_value = "ponctuel")]
    kind: String,

    /// Confirm and execute instead of only previewing the validated
    /// transfer.
    #[arg(long)]
    confirm: bool,
}

#[derive(Args, Debug)]
struct Card {
    #[command(subcommand)]
    command: CardCommand,
}

#[derive(Subcommand, Debug)]
enum CardCommand {
    /// Adjust the payment/withdrawal ceilings (euros).
    Limits {
        #[arg(long)]
        card: String,
        #[arg(long)]
        payment: String,
        #[arg(long)]
        withdrawal: String,
    },
    /// Block the card for good ("faire opposition"). Irreversible.
    Block {
        #[arg(long)]
        card: String,
    },
    /// Reveal the PIN; requires the account's secret code.
    Pin {
        #[arg(long)]
        card: String,
        #[arg(long)]
        secret: String,
    },
}

#[derive(Args, Debug)]
struct Simulate {
    /// `immobilier`, `consommation` or `auto`.
    #[arg(long, default_value = "immobilier")]
    project: String,

    /// Amount in euros; defaults to the project's preset.
    #[arg(long)]
    amount: Option<f64>,

    /// Duration in years; defaults to the project's preset.
    #[arg(long)]
    years: Option<u32>,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "horizon=info,ledger=info".to_string()),
        )
        .init();

    tracing::debug!(store = %cli.store.display(), "using snapshot store");

    let store = LedgerStore::at_path(&cli.store);
    match cli.command {
        Command::Overview => overview(&store),
        Command::Transfer(args) => transfer(&store, args)?,
        Command::Card(args) => card(&store, args.command)?,
        Command::Simulate(args) => simulate(args)?,
    }

    Ok(())
}

fn overview(store: &LedgerStore<JsonFileBackend>) {
    let user = store.load();

    println!("{} — client {}", user.name, user.id);
    for account in [&user.accounts.courant, &user.accounts.livret_a] {
        println!(
            "  {:<16} {:>18}  {}",
            account.name,
            account.balance.to_string(),
            account.iban.as_deref().unwrap_or("-")
        );
    }

    println!("Cartes:");
    for card in &user.cards {
        let state = if card.blocked { "bloquée" } else { "active" };
        println!(
            "  {:<6} {} {} ({}) — plafond paiement {} / {}",
            card.id,
            card.kind.as_str(),
            card.number,
            state,
            card.limits.payment.current,
            card.limits.payment.max
        );
    }

    println!("Dernières opérations:");
    for tx in user.transactions.iter().take(6) {
        println!(
            "  {}  {:>14}  {}",
            tx.date,
            tx.amount.to_string(),
            tx.description
        );
    }
}

fn transfer(
    store: &LedgerStore<JsonFileBackend>,
    args: Transfer,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let user = store.load();
    let engine = TransferEngine::new();
    let kind = TransferKind::try_from(args.kind.as_str())?;

    let pending = engine.initiate(
        &user,
        &args.to,
        &args.amount,
        kind,
        args.reason.as_deref(),
        args.email.as_deref(),
    )?;

    println!(
        "Virement {} de {} à {} ({})",
        pending.kind.as_str(),
        pending.amount,
        pending.beneficiary.name,
        pending.reason.as_deref().unwrap_or("Non spécifié"),
    );

    if !args.confirm {
        println!("Aperçu uniquement; relancez avec --confirm pour exécuter.");
        return Ok(());
    }

    match engine.execute(&user, &pending) {
        TransferOutcome::Executed { user, transaction } => {
            store.save(&user);
            println!(
                "Exécuté: {}  nouveau solde {}",
                transaction.id.as_deref().unwrap_or("-"),
                user.accounts.courant.balance
            );
            if let Some(email) = &pending.notify_email {
                println!("Notification envoyée à {email}");
            }
        }
        TransferOutcome::Acknowledged { kind } => {
            println!("Votre virement {} a bien été enregistré.", kind.as_str());
        }
    }
    Ok(())
}

fn card(
    store: &LedgerStore<JsonFileBackend>,
    command: CardCommand,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let user = store.load();

    match command {
        CardCommand::Limits {
            card,
            payment,
            withdrawal,
        } => {
            let current = find_card(&user, &card)?;
            let new_limits = CardLimits {
                payment: Limit {
                    current: payment.parse::<Money>()?,
                    max: current.limits.payment.max,
                },
                withdrawal: Limit {
                    current: withdrawal.parse::<Money>()?,
                    max: current.limits.withdrawal.max,
                },
            };
            let updated = set_limits(&user, &card, new_limits)?;
            store.save(&updated);
            let limits = &updated.cards[card_index(&updated, &card)].limits;
            println!(
                "Plafonds de {card}: paiement {} / retrait {}",
                limits.payment.current, limits.withdrawal.current
            );
        }
        CardCommand::Block { card } => {
            let updated = set_lock(&user, &card)?;
            store.save(&updated);
            println!("Carte {card} bloquée définitivement.");
        }
        CardCommand::Pin { card, secret } => {
            let pin = reveal_pin(&user, &card, &secret)?;
            println!("Code PIN de {card}: {pin}");
        }
    }
    Ok(())
}

fn find_card<'a>(user: &'a User, card_id: &str) -> Result<&'a ledger::Card, ledger::LedgerError> {
    user.cards
        .iter()
        .find(|c| c.id == card_id)
        .ok_or_else(|| ledger::LedgerError::KeyNotFound(card_id.to_string()))
}

fn card_index(user: &User, card_id: &str) -> usize {
    user.cards
        .iter()
        .position(|c| c.id == card_id)
        .unwrap_or_default()
}

fn simulate(args: Simulate) -> Result<(), Box<dyn Error + Send + Sync>> {
    let project = LoanProject::try_from(args.project.as_str())?;
    let (_, _, default_amount) = project.amount_range();
    let (_, _, default_years) = project.duration_range();

    let amount = args.amount.unwrap_or(default_amount);
    let years = args.years.unwrap_or(default_years);
    let rate = project.annual_rate_percent();

    let result = compute_amortization(amount, rate, years);
    println!(
        "Projet {} — {amount:.0} € sur {years} ans au taux estimé de {rate}%",
        project.label()
    );
    println!("  Mensualité        {:>12.2} €", result.monthly_payment);
    println!("  Coût du crédit    {:>12.2} €", result.total_interest);
    println!("  Total remboursé   {:>12.2} €", result.total_repaid);
    Ok(())
}
