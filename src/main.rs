use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use pdv_caixa as pdv;
use pdv::models::{MovementKind, PaymentMethod, ProductQuery};
use pdv::money::{format_cents, parse_to_cents};
use pdv::services::{AuthState, ExpenseDraft, ScanOutcome};

/// Terminal front-end for the point-of-sale backend.
#[derive(Parser)]
#[command(name = "pdv", version, about = "Caixa, vendas, despesas e relatórios")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session cookie for this run.
    Login {
        email: String,
        password: String,
    },
    /// Show the signed-in operator.
    Whoami,
    /// Show the open cash session, if any.
    Status,
    /// Open a cash session with a drawer fund, e.g. "50,00".
    Open { amount: String },
    /// Post a reinforcement or withdrawal against the open session.
    Movement(MovementArgs),
    /// Close the open session and print the settlement.
    Close,
    /// Ring up a sale.
    Sell(SellArgs),
    /// List catalog products.
    Products {
        /// Name filter, accent-insensitive on the backend.
        #[arg(long)]
        search: Option<String>,
    },
    /// Record an expense.
    Expense(ExpenseArgs),
    /// List recorded expenses.
    Expenses {
        #[arg(long)]
        include_canceled: bool,
    },
    /// Cancel an expense by id.
    CancelExpense { id: Uuid },
    /// Admin landing overview: register, today's numbers, stock alerts.
    Overview,
    /// Aggregated sales dashboard.
    Dashboard,
    /// Profit report for the period.
    Profit,
    /// Daily cash-flow report.
    Flow,
}

#[derive(Args)]
struct MovementArgs {
    /// "reforco" or "sangria".
    kind: String,
    amount: String,
    description: String,
}

#[derive(Args)]
struct SellArgs {
    /// Product barcodes, scanned in order. Repeats add quantity.
    #[arg(required = true)]
    codes: Vec<String>,
    /// dinheiro, pix, debito or credito.
    #[arg(long, default_value = "dinheiro")]
    method: String,
    /// Amount tendered for cash sales, e.g. "100,00".
    #[arg(long)]
    received: Option<String>,
}

#[derive(Args)]
struct ExpenseArgs {
    description: String,
    amount: String,
    /// dinheiro, pix, debito or credito.
    #[arg(long, default_value = "dinheiro")]
    method: String,
    /// Draw the amount from the open register (cash only).
    #[arg(long)]
    from_register: bool,
    /// Expense date, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = pdv::config::load_config()?;
    pdv::config::init_tracing(&cfg.log_level, cfg.log_json);

    let app = pdv::Pdv::from_config(&cfg).context("failed to build backend client")?;

    match cli.command {
        Command::Login { email, password } => {
            let identity = app.auth.login(&email, &password).await?;
            println!("Conectado como {} ({})", identity.user.name, identity.company.name);
        }
        Command::Whoami => match app.auth.bootstrap().await {
            AuthState::Authenticated(identity) => {
                println!(
                    "{} <{}> — {} — {}",
                    identity.user.name, identity.user.email, identity.user.role,
                    identity.company.name
                );
            }
            _ => println!("Não autenticado."),
        },
        Command::Status => match app.sessions.refresh().await {
            Some(session) => {
                println!("Caixa ABERTO desde {}", session.opened_at.with_timezone(&Local));
                println!("  valor inicial: {}", format_cents(session.opening_balance_cents));
                println!("  valor atual:   {}", format_cents(session.current_balance_cents));
            }
            None => println!("Nenhum caixa aberto."),
        },
        Command::Open { amount } => {
            let session = app.sessions.open(parse_to_cents(&amount)).await?;
            println!(
                "Caixa aberto com {} (id {})",
                format_cents(session.opening_balance_cents),
                session.id
            );
        }
        Command::Movement(args) => {
            let kind = match args.kind.as_str() {
                "reforco" => MovementKind::Reinforcement,
                "sangria" => MovementKind::Withdrawal,
                other => anyhow::bail!("tipo de movimentação desconhecido: {}", other),
            };
            app.sessions.refresh().await;
            app.sessions
                .post_movement(kind, parse_to_cents(&args.amount), &args.description)
                .await?;
            if let Some(session) = app.sessions.current().await {
                println!("Saldo atual: {}", format_cents(session.current_balance_cents));
            }
        }
        Command::Close => {
            app.sessions.refresh().await;
            let summary = app.sessions.close().await?;
            println!("Caixa fechado.");
            println!("  valor inicial: {}", format_cents(summary.balances.opening_balance_cents));
            println!("  valor final:   {}", format_cents(summary.balances.final_balance_cents));
            for method in PaymentMethod::ALL {
                println!(
                    "  {:<9} {}",
                    method.label(),
                    format_cents(summary.settlement.for_method(method))
                );
            }
            println!("  Sangrias  {}", format_cents(summary.settlement.withdrawals_cents));
            println!("  Reforços  {}", format_cents(summary.settlement.reinforcements_cents));
            println!("  Total     {}", format_cents(summary.settlement.total_sales_cents));
        }
        Command::Sell(args) => {
            let method = parse_method(&args.method)?;
            app.checkout.load().await?;
            for code in &args.codes {
                match app.checkout.scan(code).await? {
                    ScanOutcome::Added { quantity, .. } => {
                        println!("  + {} (x{})", code, quantity);
                    }
                    ScanOutcome::Ignored => println!("  ~ {} (leitura repetida)", code),
                    ScanOutcome::NotFound => println!("  ? {} (não cadastrado)", code),
                }
            }
            let total = app.checkout.total_cents().await;
            println!("Total: {}", format_cents(total));
            if method == PaymentMethod::Pix {
                println!("PIX copia e cola:\n{}", app.checkout.pix_payload().await?);
            }
            let received = args.received.as_deref().map(parse_to_cents);
            let receipt = app.checkout.confirm(method, received).await?;
            println!(
                "Venda {} finalizada: {}",
                receipt.sale.id,
                format_cents(receipt.sale.total_cents)
            );
            if let Some(change) = receipt.change_cents {
                println!("Troco: {}", format_cents(change));
            }
        }
        Command::Products { search } => {
            let query = ProductQuery {
                search,
                ..ProductQuery::default()
            };
            for p in app.products.list(&query).await? {
                println!(
                    "{}  {:<30} {:>12}  estoque {}",
                    p.id,
                    p.name,
                    format_cents(p.sale_price_cents),
                    p.stock_quantity
                );
            }
        }
        Command::Expense(args) => {
            let mut draft = ExpenseDraft::new(
                args.date.unwrap_or_else(|| Local::now().date_naive()),
            );
            draft.description = args.description;
            draft.amount_cents = parse_to_cents(&args.amount);
            draft.payment_method = parse_method(&args.method)?;
            if args.from_register {
                app.sessions.refresh().await;
                draft.draws_from_cash = true;
                draft.reconcile(app.sessions.is_open().await);
            }
            let expense = app.expenses.submit(&mut draft).await?;
            println!(
                "Despesa registrada: {} — {}",
                expense.description,
                format_cents(expense.amount_cents)
            );
        }
        Command::Expenses { include_canceled } => {
            for e in app.expenses.list(include_canceled).await? {
                println!(
                    "{}  {}  {:<30} {:>12}  {:?}",
                    e.id, e.date, e.description, format_cents(e.amount_cents), e.status
                );
            }
        }
        Command::CancelExpense { id } => {
            let expense = app.expenses.cancel(id).await?;
            println!("Despesa cancelada: {}", expense.description);
        }
        Command::Overview => {
            let overview = app.reports.admin_overview().await?;
            println!("Caixa: {:?}", overview.register.status);
            if let Some(balance) = overview.register.current_balance_cents {
                println!("  saldo atual: {}", format_cents(balance));
            }
            println!("Hoje:");
            println!("  entradas: {}", format_cents(overview.today.inflow_cents));
            println!("  despesas: {}", format_cents(overview.today.expenses_cents));
            println!("  lucro:    {}", format_cents(overview.today.profit_cents));
            println!(
                "Produtos: {} em falta, {} estoque baixo, {} parados",
                overview.products.out_of_stock,
                overview.products.low_stock,
                overview.products.stale
            );
        }
        Command::Dashboard => {
            let report = app.reports.dashboard().await?;
            println!(
                "Faturamento: {} em {} vendas (ticket médio {})",
                format_cents(report.financial.total_revenue_cents),
                report.financial.sale_count,
                format_cents(report.financial.average_ticket_cents)
            );
            for m in &report.financial.by_method {
                println!("  {:<9} {}", m.method, format_cents(m.amount_cents));
            }
            println!("Mais vendidos:");
            for p in &report.top_products {
                println!("  {:<30} x{}  {}", p.name, p.quantity, format_cents(p.revenue_cents));
            }
            println!(
                "Estoque: {} itens, {} em alerta, valor {}",
                report.stock.total_items,
                report.stock.low_stock_alerts,
                format_cents(report.stock.stock_value_cents)
            );
        }
        Command::Profit => {
            let report = app.reports.profit().await?;
            println!("Faturamento: {}", format_cents(report.revenue_cents));
            println!("Custo:       {}", format_cents(report.total_cost_cents));
            println!("Lucro:       {}", format_cents(report.profit_cents));
            println!("Margem:      {:.1}%", report.margin_percent);
        }
        Command::Flow => {
            let report = app.reports.cash_flow().await?;
            println!(
                "Período: {} (média diária {})",
                format_cents(report.period_total_cents),
                format_cents(report.daily_average_cents)
            );
            for day in &report.days {
                println!("  {}  {}", day.date, format_cents(day.total_cents));
            }
        }
    }

    Ok(())
}

fn parse_method(raw: &str) -> anyhow::Result<PaymentMethod> {
    match raw.to_lowercase().as_str() {
        "dinheiro" => Ok(PaymentMethod::Cash),
        "pix" => Ok(PaymentMethod::Pix),
        "debito" | "débito" => Ok(PaymentMethod::Debit),
        "credito" | "crédito" => Ok(PaymentMethod::Credit),
        other => anyhow::bail!("método de pagamento desconhecido: {}", other),
    }
}
