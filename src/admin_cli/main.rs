use aidhub::{
    api::{facilities, subscriptions, users, validation::ValidationErrors},
    config::Config,
    database::{
        self,
        models::user,
        schema, seed,
        types::{AccountStatus, SystemRole},
    },
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

// Определяем структуру команд CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, verbatim_doc_comment)]
/// Утилита командной строки для администрирования AidHub.
/// Создаёт схему БД, справочники, администраторов и обслуживает подписки.
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Команды для работы с базой данных.
    Db {
        #[command(subcommand)]
        db_command: DbCommand,
    },
    /// Управление учётными записями.
    User {
        #[command(subcommand)]
        user_command: UserCommand,
    },
    /// Модерация учреждений.
    Facility {
        #[command(subcommand)]
        facility_command: FacilityCommand,
    },
    /// Обслуживание подписок.
    Subscriptions {
        #[command(subcommand)]
        subscriptions_command: SubscriptionsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommand {
    /// Создаёт недостающие таблицы по описаниям сущностей.
    Migrate,
    /// Заполняет роли и тарифы Free / Basic / Premium. Повторный запуск безопасен.
    Seed,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Создаёт администратора (через публичную регистрацию это невозможно).
    CreateAdmin {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long, default_value = "System")]
        firstname: String,

        #[arg(long, default_value = "Administrator")]
        lastname: String,
    },
}

#[derive(Subcommand, Debug)]
enum FacilityCommand {
    /// Одобряет учреждение (или отклоняет с флагом --reject).
    Approve {
        #[arg(long)]
        id: i32,

        #[arg(long, default_value_t = false)]
        reject: bool,
    },
}

#[derive(Subcommand, Debug)]
enum SubscriptionsCommand {
    /// Активирует отложенные подписки пользователей без действующей подписки.
    Rollover,
}

async fn create_admin(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    firstname: &str,
    lastname: &str,
) -> Result<user::Model, Box<dyn std::error::Error>> {
    let mut errors = ValidationErrors::new();
    errors.email("email", Some(email));
    errors.password(Some(password), Some(password));
    if !errors.is_empty() {
        return Err(format!("Некорректные данные: {:?}", errors.as_map()).into());
    }
    if users::email_taken(db, email, None).await? {
        return Err(format!("Пользователь с email {} уже существует", email).into());
    }

    let now = Utc::now();
    let admin = user::ActiveModel {
        firstname: Set(firstname.to_string()),
        lastname: Set(lastname.to_string()),
        email: Set(email.to_string()),
        password: Set(users::hash_password(password)?),
        status: Set(AccountStatus::Active.as_str().to_string()),
        systemrole_id: Set(SystemRole::Admin.id()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(admin)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let cli = Cli::parse();
    let db = database::connect().await?;

    match &cli.command {
        Commands::Db { db_command } => match db_command {
            DbCommand::Migrate => {
                println!("Создание схемы...");
                schema::create_schema(&db).await?;
                println!("Схема готова.");
            }
            DbCommand::Seed => {
                seed::seed_roles(&db).await?;
                seed::seed_default_plans(&db).await?;
                println!("Сиды успешно применены.");
            }
        },
        Commands::User { user_command } => match user_command {
            UserCommand::CreateAdmin {
                email,
                password,
                firstname,
                lastname,
            } => {
                let admin = create_admin(&db, email, password, firstname, lastname).await?;
                println!("Создан администратор {} (id = {})", admin.email, admin.id);
            }
        },
        Commands::Facility { facility_command } => match facility_command {
            FacilityCommand::Approve { id, reject } => {
                let facility = facilities::functions::set_approval(&db, *id, !reject).await?;
                let status = if facility.is_managable { "одобрено" } else { "отклонено" };
                println!("Учреждение {} ({}) {}", facility.id, facility.center_name, status);
            }
        },
        Commands::Subscriptions { subscriptions_command } => match subscriptions_command {
            SubscriptionsCommand::Rollover => {
                let config = Config::from_env()?;
                let promoted = subscriptions::functions::rollover_all(&db, config.today()).await?;
                println!("Активировано отложенных подписок: {}", promoted);
            }
        },
    }

    Ok(())
}
