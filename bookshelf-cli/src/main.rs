use std::path::PathBuf;
use std::process;

use anyhow::Result;
use bookshelf_client::{
    AuthResponse, Book, BookshelfClient, ClientError, ClientResult, CreateBookForm,
    DEFAULT_PAGE_SIZE, DEFAULT_RATING, FileSessionStore, FsMediaLibrary, ListBooksResponse,
    Platform, acquire_image,
};
use clap::{Parser, Subcommand};

const SESSION_FILE: &str = ".bookshelf_session";
const DEFAULT_HTTP_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "bookshelf-cli", version, about = "CLI клиент для bookshelf-server")]
struct Cli {
    /// Адрес HTTP-сервера.
    #[arg(long, global = true, env = "BOOKSHELF_API_URL")]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: удаляет сохранённую сессию.
    Logout,
    /// Новая рекомендация книги (требует вход).
    ///
    /// После успеха показывает первую страницу ленты.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        caption: String,
        #[arg(long, default_value_t = DEFAULT_RATING)]
        rating: u8,
        /// Путь к файлу обложки.
        #[arg(long)]
        image: PathBuf,
    },
    /// Лента рекомендаций (требует вход).
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = normalize_server(cli.server.unwrap_or_else(|| DEFAULT_HTTP_SERVER.to_string()));
    let mut client = BookshelfClient::connect(server, FileSessionStore::new(SESSION_FILE))
        .await
        .map_err(map_client_error)?;

    let uses_session = cli.command.uses_session();
    if let Err(err) = execute(&mut client, cli.command).await {
        if should_drop_session(&err, uses_session, client.session().is_some()) {
            // сервер больше не принимает токен: забываем его
            client.logout().await.map_err(map_client_error)?;
            eprintln!("Сессия истекла, выполните вход заново");
        }
        return Err(map_client_error(err));
    }

    Ok(())
}

impl Command {
    fn uses_session(&self) -> bool {
        matches!(self, Command::Create { .. } | Command::List { .. })
    }
}

async fn execute(client: &mut BookshelfClient, command: Command) -> ClientResult<()> {
    match command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let auth = client.register(&username, &email, &password).await?;
            print_auth("Регистрация успешна", &auth);
        }
        Command::Login { email, password } => {
            let auth = client.login(&email, &password).await?;
            print_auth("Вход выполнен", &auth);
        }
        Command::Logout => {
            client.logout().await?;
            println!("Сессия завершена");
        }
        Command::Create {
            title,
            caption,
            rating,
            image,
        } => {
            let media = FsMediaLibrary::new(image);
            let selected = acquire_image(&media, Platform::Native).await?;

            let mut form = CreateBookForm {
                title,
                caption,
                rating,
                image: selected,
            };
            let book = client.submit_book(&mut form).await?;
            print_book("Рекомендация опубликована", &book);

            let list = client.list_books(1, DEFAULT_PAGE_SIZE).await?;
            print_list(&list);
        }
        Command::List { page, limit } => {
            let list = client.list_books(page, limit).await?;
            print_list(&list);
        }
    }

    Ok(())
}

/// Сохранённый токен отклонён сервером при запросе, который его использует.
fn should_drop_session(err: &ClientError, uses_session: bool, has_session: bool) -> bool {
    uses_session && has_session && err.is_unauthorized()
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn map_client_error(err: ClientError) -> anyhow::Error {
    let message = match err {
        ClientError::Unauthorized => {
            "требуется авторизация: выполните `bookshelf-cli login ...` или `bookshelf-cli register ...`"
                .to_string()
        }
        ClientError::PermissionDenied => "нет доступа к файлу изображения".to_string(),
        ClientError::Http(err) => format!("ошибка HTTP: {err}"),
        ClientError::Io(err) => format!("ошибка ввода-вывода: {err}"),
        // текст сервера и локальной валидации показываем как есть
        other => other.to_string(),
    };
    anyhow::anyhow!(message)
}

fn print_auth(title: &str, auth: &AuthResponse) {
    println!("{title}");
    println!("user:");
    println!("  id: {}", auth.user.id);
    println!("  username: {}", auth.user.username);
    println!("  email: {}", auth.user.email);
    println!("  profile_image: {}", auth.user.profile_image);
    println!("  created_at: {}", auth.user.created_at);
}

fn print_book(title: &str, book: &Book) {
    println!("{title}");
    println!("id: {}", book.id);
    println!("title: {}", book.title);
    println!("caption: {}", book.caption);
    println!("rating: {}", stars(book.rating));
    println!("image: {}", book.image);
    println!("user: {}", book.user);
    println!("created_at: {}", book.created_at);
}

fn print_list(list: &ListBooksResponse) {
    println!(
        "Книг: {} (страница {} из {}, всего {})",
        list.books.len(),
        list.current_page,
        list.total_pages,
        list.total_books
    );
    for book in &list.books {
        println!("---");
        println!("[{}] {} {}", book.id, book.title, stars(book.rating));
        println!("{}", book.caption);
        println!("{}", book.image);
    }
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
