use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, DTOs, Actions and Queries)
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    // --- Custom Actions ---
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    /// Filter used by list requests
    type Query: Send + Sync + Debug;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and Payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;
    fn on_delete(&self) -> Result<(), String> {
        Ok(())
    }

    // --- Action Handler ---

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;

    /// Whether this entity belongs in the result of a list request
    fn matches(&self, query: &Self::Query) -> bool;

    /// Checked against every other stored entity before a create, update or
    /// action is committed. `Some(reason)` refuses the write.
    fn conflicts_with(&self, _other: &Self) -> Option<String> {
        None
    }
}

/// Errors produced by the actor plumbing itself.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped the response")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Change notification published by a ResourceActor to its subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent<T: Entity> {
    Created(T),
    Updated(T),
    Deleted(T),
}

pub type SubscriptionId = u64;

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        query: T::Query,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Subscribe {
        events: mpsc::UnboundedSender<ResourceEvent<T>>,
        respond_to: Response<SubscriptionId>,
    },
    Unsubscribe {
        id: SubscriptionId,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
    subscribers: HashMap<SubscriptionId, mpsc::UnboundedSender<ResourceEvent<T>>>,
    next_subscription: SubscriptionId,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
            subscribers: HashMap::new(),
            next_subscription: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { payload, respond_to } => {
                    let id = (self.next_id_fn)();
                    match T::from_create(id.clone(), payload) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create() {
                                let _ = respond_to.send(Err(FrameworkError::Rejected(e)));
                                continue;
                            }
                            if let Some(reason) = self.find_conflict(&item) {
                                let _ = respond_to.send(Err(FrameworkError::Conflict(reason)));
                                continue;
                            }
                            self.store.insert(id.clone(), item.clone());
                            self.publish(ResourceEvent::Created(item));
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            let _ = respond_to.send(Err(FrameworkError::Rejected(e)));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { query, respond_to } => {
                    let items = self
                        .store
                        .values()
                        .filter(|item| item.matches(&query))
                        .cloned()
                        .collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let Some(mut item) = self.store.get(&id).cloned() else {
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_update(patch) {
                        let _ = respond_to.send(Err(FrameworkError::Rejected(e)));
                        continue;
                    }
                    if let Some(reason) = self.find_conflict(&item) {
                        let _ = respond_to.send(Err(FrameworkError::Conflict(reason)));
                        continue;
                    }
                    self.store.insert(id, item.clone());
                    self.publish(ResourceEvent::Updated(item.clone()));
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let Some(item) = self.store.get(&id) else {
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete() {
                        let _ = respond_to.send(Err(FrameworkError::Rejected(e)));
                        continue;
                    }
                    if let Some(removed) = self.store.remove(&id) {
                        self.publish(ResourceEvent::Deleted(removed));
                    }
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let Some(mut item) = self.store.get(&id).cloned() else {
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    match item.handle_action(action) {
                        Ok(result) => {
                            if let Some(reason) = self.find_conflict(&item) {
                                let _ = respond_to.send(Err(FrameworkError::Conflict(reason)));
                                continue;
                            }
                            self.store.insert(id, item.clone());
                            self.publish(ResourceEvent::Updated(item));
                            let _ = respond_to.send(Ok(result));
                        }
                        Err(e) => {
                            let _ = respond_to.send(Err(FrameworkError::Rejected(e)));
                        }
                    }
                }
                ResourceRequest::Subscribe { events, respond_to } => {
                    let id = self.next_subscription;
                    self.next_subscription += 1;
                    self.subscribers.insert(id, events);
                    debug!(subscription_id = id, "Subscriber registered");
                    let _ = respond_to.send(Ok(id));
                }
                ResourceRequest::Unsubscribe { id } => {
                    if self.subscribers.remove(&id).is_some() {
                        debug!(subscription_id = id, "Subscriber removed");
                    }
                }
            }
        }
    }

    /// First objection any other stored entity raises against `candidate`.
    /// Runs inside the actor loop, so check and commit are one step.
    fn find_conflict(&self, candidate: &T) -> Option<String> {
        self.store
            .values()
            .filter(|other| other.id() != candidate.id())
            .find_map(|other| candidate.conflicts_with(other))
    }

    /// Fan an event out to every live subscriber, dropping the ones whose
    /// receiving side has gone away.
    fn publish(&mut self, event: ResourceEvent<T>) {
        self.subscribers.retain(|id, events| {
            let alive = events.send(event.clone()).is_ok();
            if !alive {
                warn!(subscription_id = *id, "Pruning closed subscriber");
            }
            alive
        });
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { payload, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self, query: T::Query) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { query, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }

    /// Register `handler` for every change event the actor publishes.
    ///
    /// The returned [`Subscription`] unsubscribes when dropped.
    pub async fn subscribe(
        &self,
        handler: impl Fn(ResourceEvent<T>) + Send + 'static,
    ) -> Result<Subscription<T>, FrameworkError> {
        let (events, mut inbox) = mpsc::unbounded_channel();
        let id = self
            .request(|respond_to| ResourceRequest::Subscribe { events, respond_to })
            .await?;

        let forwarder = tokio::spawn(async move {
            while let Some(event) = inbox.recv().await {
                handler(event);
            }
        });

        Ok(Subscription {
            id,
            sender: self.sender.clone(),
            forwarder,
        })
    }
}

/// Scoped handle on a change-event subscription.
pub struct Subscription<T: Entity> {
    id: SubscriptionId,
    sender: mpsc::Sender<ResourceRequest<T>>,
    forwarder: tokio::task::JoinHandle<()>,
}

impl<T: Entity> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl<T: Entity> Drop for Subscription<T> {
    fn drop(&mut self) {
        // If the mailbox is full the actor still prunes us on its next publish,
        // since aborting the forwarder closes the event channel.
        let _ = self.sender.try_send(ResourceRequest::Unsubscribe { id: self.id });
        self.forwarder.abort();
    }
}
