use rps_persistence::PlayerRepository;
use rps_types::{ErrorResponse, GameError, NewPlayer, PlayerStats};
use std::convert::Infallible;
use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

pub mod config;

type ApiReply = WithStatus<Json>;

pub fn create_routes(
    player_repository: Arc<PlayerRepository>,
    cors_origin: &str,
) -> impl Filter<Extract = impl warp::Reply + use<>, Error = warp::Rejection> + Clone + use<> {
    let repository_filter = warp::any().map({
        let player_repository = player_repository.clone();
        move || player_repository.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let list_players = warp::path!("api" / "players")
        .and(warp::get())
        .and(repository_filter.clone())
        .and_then(handle_list_players);

    let create_player = warp::path!("api" / "players")
        .and(warp::post())
        .and(warp::body::json::<NewPlayer>())
        .and(repository_filter.clone())
        .and_then(handle_create_player);

    // Must come before the `{id}` route.
    let leaderboard = warp::path!("api" / "players" / "leaderboard-stats")
        .and(warp::get())
        .and(repository_filter.clone())
        .and_then(handle_leaderboard_request);

    let get_player = warp::path!("api" / "players" / String)
        .and(warp::get())
        .and(repository_filter.clone())
        .and_then(handle_get_player);

    let update_stats = warp::path!("api" / "players" / String / "stats")
        .and(warp::put())
        .and(warp::body::json::<PlayerStats>())
        .and(repository_filter.clone())
        .and_then(handle_update_stats);

    let reset_stats = warp::path!("api" / "players" / String / "reset-stats")
        .and(warp::put())
        .and(repository_filter.clone())
        .and_then(handle_reset_stats);

    let cors = warp::cors()
        .allow_origin(cors_origin)
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "PUT", "OPTIONS"]);

    health
        .or(list_players)
        .or(create_player)
        .or(leaderboard)
        .or(get_player)
        .or(update_stats)
        .or(reset_stats)
        .recover(handle_rejection)
        .with(cors)
        .with(warp::log("rps_arena"))
}

fn json_reply<T: serde::Serialize>(body: &T, status: StatusCode) -> ApiReply {
    warp::reply::with_status(warp::reply::json(body), status)
}

fn error_reply(error: &GameError, status: StatusCode) -> ApiReply {
    json_reply(&ErrorResponse::from(error), status)
}

fn store_failure(context: &str, err: anyhow::Error) -> ApiReply {
    tracing::error!("{}: {:#}", context, err);
    error_reply(
        &GameError::StoreFailure {
            message: context.to_string(),
        },
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

fn parse_player_id(raw: &str) -> Result<Uuid, ApiReply> {
    Uuid::parse_str(raw).map_err(|_| {
        json_reply(
            &ErrorResponse {
                error: format!("Invalid player ID format: {raw}"),
            },
            StatusCode::BAD_REQUEST,
        )
    })
}

fn not_found(player_id: Uuid) -> ApiReply {
    error_reply(
        &GameError::PlayerNotFound {
            player_id: player_id.to_string(),
        },
        StatusCode::NOT_FOUND,
    )
}

async fn handle_list_players(
    player_repository: Arc<PlayerRepository>,
) -> Result<ApiReply, warp::Rejection> {
    match player_repository.find_all().await {
        Ok(players) => Ok(json_reply(&players, StatusCode::OK)),
        Err(err) => Ok(store_failure("Failed to fetch players", err)),
    }
}

async fn handle_create_player(
    new_player: NewPlayer,
    player_repository: Arc<PlayerRepository>,
) -> Result<ApiReply, warp::Rejection> {
    let name = new_player.name.trim();
    if name.is_empty() {
        return Ok(error_reply(&GameError::InvalidPlayerName, StatusCode::BAD_REQUEST));
    }

    match player_repository.find_by_name(name).await {
        Ok(Some(_)) => {
            return Ok(error_reply(
                &GameError::PlayerNameTaken {
                    name: name.to_string(),
                },
                StatusCode::CONFLICT,
            ));
        }
        Ok(None) => {}
        Err(err) => return Ok(store_failure("Failed to look up player name", err)),
    }

    match player_repository.create_player(new_player).await {
        Ok(player) => {
            tracing::info!("Registered player '{}'", player.name);
            Ok(json_reply(&player, StatusCode::CREATED))
        }
        Err(err) => Ok(store_failure("Failed to create player", err)),
    }
}

async fn handle_leaderboard_request(
    player_repository: Arc<PlayerRepository>,
) -> Result<ApiReply, warp::Rejection> {
    match player_repository.leaderboard_stats().await {
        Ok(entries) => Ok(json_reply(&entries, StatusCode::OK)),
        Err(err) => Ok(store_failure("Failed to fetch leaderboard", err)),
    }
}

async fn handle_get_player(
    player_id: String,
    player_repository: Arc<PlayerRepository>,
) -> Result<ApiReply, warp::Rejection> {
    let player_id = match parse_player_id(&player_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match player_repository.find_by_id(player_id).await {
        Ok(Some(player)) => Ok(json_reply(&player, StatusCode::OK)),
        Ok(None) => Ok(not_found(player_id)),
        Err(err) => Ok(store_failure("Failed to fetch player", err)),
    }
}

async fn handle_update_stats(
    player_id: String,
    stats: PlayerStats,
    player_repository: Arc<PlayerRepository>,
) -> Result<ApiReply, warp::Rejection> {
    let player_id = match parse_player_id(&player_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    if !stats.is_consistent() {
        tracing::warn!("Storing inconsistent stats for {}", player_id);
    }

    match player_repository.update_stats(player_id, &stats).await {
        Ok(Some(player)) => Ok(json_reply(&player, StatusCode::OK)),
        Ok(None) => Ok(not_found(player_id)),
        Err(err) => Ok(store_failure("Failed to update player stats", err)),
    }
}

async fn handle_reset_stats(
    player_id: String,
    player_repository: Arc<PlayerRepository>,
) -> Result<ApiReply, warp::Rejection> {
    let player_id = match parse_player_id(&player_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match player_repository.reset_stats(player_id).await {
        Ok(Some(player)) => {
            tracing::info!("Reset stats for '{}'", player.name);
            Ok(json_reply(&player, StatusCode::OK))
        }
        Ok(None) => Ok(not_found(player_id)),
        Err(err) => Ok(store_failure("Failed to reset player stats", err)),
    }
}

async fn handle_rejection(rejection: warp::Rejection) -> Result<ApiReply, Infallible> {
    let (message, status) = if rejection.is_not_found() {
        ("Not found".to_string(), StatusCode::NOT_FOUND)
    } else if let Some(err) = rejection.find::<warp::filters::body::BodyDeserializeError>() {
        (format!("Invalid request body: {err}"), StatusCode::BAD_REQUEST)
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        ("Method not allowed".to_string(), StatusCode::METHOD_NOT_ALLOWED)
    } else {
        tracing::warn!("Unhandled rejection: {:?}", rejection);
        ("Internal server error".to_string(), StatusCode::INTERNAL_SERVER_ERROR)
    };

    Ok(json_reply(&ErrorResponse { error: message }, status))
}
