//! # Cola de Admisión
//! src/pool/queue.rs
//!
//! Cola FIFO acotada y thread-safe entre el acceptor (productor) y los
//! workers (consumidores).
//!
//! - `try_enqueue` nunca bloquea: si la cola está llena devuelve el elemento
//!   y el acceptor descarta la conexión.
//! - `dequeue` bloquea con un `Condvar` mientras la cola está vacía; un
//!   worker ocioso no consume CPU.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Motivo por el que no se pudo encolar. Cada variante devuelve el elemento
/// al llamador.
#[derive(Debug)]
pub enum EnqueueError<T> {
    /// La cola ya tiene `capacity` elementos
    Full(T),

    /// La cola fue cerrada (apagado en curso)
    Closed(T),
}

/// Estado protegido por el mutex
struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Cola de admisión acotada
pub struct AdmissionQueue<T> {
    /// Elementos pendientes + bandera de cierre
    state: Arc<Mutex<QueueState<T>>>,

    /// Notifica a los workers cuando llega un elemento o se cierra la cola
    not_empty: Arc<Condvar>,

    /// Capacidad máxima de la cola
    capacity: usize,
}

impl<T> AdmissionQueue<T> {
    /// Crea una nueva cola con capacidad máxima
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            })),
            not_empty: Arc::new(Condvar::new()),
            capacity,
        }
    }

    // Un worker que entra en pánico no deja la cola inconsistente: cada
    // operación modifica el VecDeque en un solo paso.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola un elemento sin bloquear
    ///
    /// Retorna `Err(Full)` si la cola ya tiene `capacity` elementos.
    pub fn try_enqueue(&self, item: T) -> Result<(), EnqueueError<T>> {
        let mut state = self.lock();

        if state.closed {
            return Err(EnqueueError::Closed(item));
        }
        if state.items.len() >= self.capacity {
            return Err(EnqueueError::Full(item));
        }

        state.items.push_back(item);
        drop(state);

        // Despertar a un worker esperando
        self.not_empty.notify_one();
        Ok(())
    }

    /// Desencola el elemento más antiguo
    ///
    /// Bloquea mientras la cola esté vacía. Retorna `None` solo cuando la
    /// cola está cerrada y ya no quedan elementos.
    pub fn dequeue(&self) -> Option<T> {
        let mut state = self.lock();

        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Cierra la cola: no admite más elementos y despierta a todos los
    /// workers. Los elementos ya encolados se siguen entregando.
    pub fn close(&self) {
        self.lock().closed = true;
        self.not_empty.notify_all();
    }

    /// Verifica si la cola fue cerrada
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retorna la capacidad máxima
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Verifica si la cola está llena
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }
}

impl<T> Clone for AdmissionQueue<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            not_empty: Arc::clone(&self.not_empty),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fifo_order() {
        let queue = AdmissionQueue::new(10);
        for i in 0..5 {
            queue.try_enqueue(i).unwrap();
        }

        let out: Vec<i32> = (0..5).filter_map(|_| queue.dequeue()).collect();
        assert_eq!(out, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_capacity_rejects_newest() {
        let queue = AdmissionQueue::new(2);

        assert!(queue.try_enqueue("a").is_ok());
        assert!(queue.try_enqueue("b").is_ok());
        assert!(queue.is_full());

        match queue.try_enqueue("c") {
            Err(EnqueueError::Full(item)) => assert_eq!(item, "c"),
            other => panic!("expected Full, got {:?}", other),
        }
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue(), Some("a"));
    }

    #[test]
    fn test_slot_frees_after_dequeue() {
        let queue = AdmissionQueue::new(1);
        queue.try_enqueue(1).unwrap();
        assert!(queue.try_enqueue(2).is_err());

        assert_eq!(queue.dequeue(), Some(1));
        assert!(queue.try_enqueue(2).is_ok());
    }

    #[test]
    fn test_dequeue_blocks_until_enqueue() {
        let queue = AdmissionQueue::new(4);
        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || queue.dequeue())
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!consumer.is_finished());

        queue.try_enqueue(42).unwrap();
        assert_eq!(consumer.join().unwrap(), Some(42));
    }

    #[test]
    fn test_close_wakes_all_waiters() {
        let queue: AdmissionQueue<u8> = AdmissionQueue::new(4);
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || queue.dequeue())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        queue.close();

        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), None);
        }
    }

    #[test]
    fn test_close_drains_pending_items() {
        let queue = AdmissionQueue::new(4);
        queue.try_enqueue(1).unwrap();
        queue.try_enqueue(2).unwrap();
        queue.close();

        assert!(queue.is_closed());
        assert!(matches!(queue.try_enqueue(3), Err(EnqueueError::Closed(3))));
        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn test_concurrent_producers_never_exceed_capacity() {
        let queue = AdmissionQueue::new(8);
        let producers: Vec<_> = (0..4)
            .map(|p| {
                let queue = queue.clone();
                thread::spawn(move || {
                    (0..10)
                        .filter(|i| queue.try_enqueue(p * 100 + i).is_ok())
                        .count()
                })
            })
            .collect();

        let accepted: usize = producers.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(accepted, 8);
        assert_eq!(queue.len(), 8);
    }
}
