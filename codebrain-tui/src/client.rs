//! Background execution of API calls.
//!
//! The event loop never awaits the network itself. Each call is described by a
//! [`Request`], spawned on the runtime under the lifetime guard of the view that
//! issued it, and its outcome comes back as an [`ApiMsg`] carrying the same
//! ticket and the mount counter of the issuing view. Calls whose view was closed
//! in the meantime never report back.

use codebrain_core::{
    CodeBrainApi, CodeBrainResult, DynCodeBrainApi, LifetimeGuard, Playbook, PlaybookCreate, Task,
    TaskCreate, Ticket,
};
use tokio::sync::mpsc;
use tracing::debug;

use crate::events::AppEvent;

/// Which view asked for the playbook list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybookTarget {
    List,
    Creator,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    LoadPlaybooks { target: PlaybookTarget, ticket: Ticket },
    GetPlaybook { ticket: Ticket, id: String },
    DeletePlaybook { ticket: Ticket, id: String },
    CreatePlaybook { ticket: Ticket, body: PlaybookCreate },
    CreateTask { ticket: Ticket, body: TaskCreate },
    LoadTask { ticket: Ticket, id: String },
    ConfirmTask { ticket: Ticket, id: String },
    SendInteraction { ticket: Ticket, id: String, input: String },
}

impl Request {
    pub fn ticket(&self) -> Ticket {
        match self {
            Request::LoadPlaybooks { ticket, .. }
            | Request::GetPlaybook { ticket, .. }
            | Request::DeletePlaybook { ticket, .. }
            | Request::CreatePlaybook { ticket, .. }
            | Request::CreateTask { ticket, .. }
            | Request::LoadTask { ticket, .. }
            | Request::ConfirmTask { ticket, .. }
            | Request::SendInteraction { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug)]
pub enum ApiMsg {
    Playbooks {
        target: PlaybookTarget,
        ticket: Ticket,
        result: CodeBrainResult<Vec<Playbook>>,
    },
    Playbook {
        ticket: Ticket,
        result: CodeBrainResult<Playbook>,
    },
    PlaybookDeleted {
        ticket: Ticket,
        result: CodeBrainResult<()>,
    },
    PlaybookCreated {
        ticket: Ticket,
        result: CodeBrainResult<Playbook>,
    },
    TaskCreated {
        ticket: Ticket,
        result: CodeBrainResult<Task>,
    },
    TaskLoaded {
        ticket: Ticket,
        result: CodeBrainResult<Task>,
    },
    TaskConfirmed {
        ticket: Ticket,
        result: CodeBrainResult<Task>,
    },
    InteractionSent {
        ticket: Ticket,
        result: CodeBrainResult<Task>,
    },
}

/// A request paired with the lifetime and mount of the view that issued it.
#[derive(Debug)]
pub struct Pending {
    pub request: Request,
    pub guard: LifetimeGuard,
    pub mount: u64,
}

impl Pending {
    pub fn new(request: Request, guard: LifetimeGuard, mount: u64) -> Self {
        Self {
            request,
            guard,
            mount,
        }
    }
}

pub async fn execute(api: &dyn CodeBrainApi, request: Request) -> ApiMsg {
    match request {
        Request::LoadPlaybooks { target, ticket } => ApiMsg::Playbooks {
            target,
            ticket,
            result: api.fetch_playbooks().await,
        },
        Request::GetPlaybook { ticket, id } => ApiMsg::Playbook {
            ticket,
            result: api.get_playbook(&id).await,
        },
        Request::DeletePlaybook { ticket, id } => ApiMsg::PlaybookDeleted {
            ticket,
            result: api.delete_playbook(&id).await,
        },
        Request::CreatePlaybook { ticket, body } => ApiMsg::PlaybookCreated {
            ticket,
            result: api.create_playbook(&body).await,
        },
        Request::CreateTask { ticket, body } => ApiMsg::TaskCreated {
            ticket,
            result: api.create_task(&body).await,
        },
        Request::LoadTask { ticket, id } => ApiMsg::TaskLoaded {
            ticket,
            result: api.get_task(&id).await,
        },
        Request::ConfirmTask { ticket, id } => ApiMsg::TaskConfirmed {
            ticket,
            result: api.confirm_task(&id).await,
        },
        Request::SendInteraction { ticket, id, input } => ApiMsg::InteractionSent {
            ticket,
            result: api.send_interaction(&id, &input).await,
        },
    }
}

pub fn spawn_request(api: DynCodeBrainApi, pending: Pending, tx: mpsc::Sender<AppEvent>) {
    let Pending {
        request,
        guard,
        mount,
    } = pending;
    let operation = request.ticket().operation();
    tokio::spawn(async move {
        match guard.run(execute(api.as_ref(), request)).await {
            Some(msg) => {
                if tx.send(AppEvent::Api { mount, msg }).await.is_err() {
                    debug!("Event loop gone, dropping {} response", operation.name());
                }
            }
            None => debug!("View closed, abandoned {}", operation.name()),
        }
    });
}
